pub mod boundary;
pub mod normalize;
pub mod places;
pub mod press_release;
pub mod snapshot;

use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::db::InsertStats;
use crate::error::{AppError, Result};

pub use boundary::load_boundaries;
pub use places::PlaceIndex;
pub use press_release::load_press_releases;
pub use snapshot::load_snapshots;

/// What to do with a row that cannot be mapped onto its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MalformedRows {
    #[default]
    Fail,
    /// Log and drop the whole row.
    Skip,
}

impl MalformedRows {
    /// Either propagates `err` or records the skip.
    fn handle(self, err: AppError, skipped: &mut usize) -> Result<()> {
        match self {
            MalformedRows::Fail => Err(err),
            MalformedRows::Skip => {
                tracing::warn!("Skipping row: {}", err);
                *skipped += 1;
                Ok(())
            }
        }
    }
}

/// Rows parsed from one source file.
#[derive(Debug, Clone)]
pub struct Parsed<T> {
    pub records: Vec<T>,
    pub skipped: usize,
}

/// Outcome of loading one delimited source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceReport {
    pub stats: InsertStats,
    pub skipped: usize,
}

/// Read every non-blank record of a headerless delimited file together
/// with its 1-based line number. Fields are kept verbatim (no quoting).
async fn read_delimited(path: &Path, delimiter: u8) -> Result<Vec<(u64, StringRecord)>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AppError::read(path, e))?;
    let content = content.trim_start_matches('\u{feff}');

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .delimiter(delimiter)
        .from_reader(content.as_bytes());

    // Blank lines are dropped by the reader without advancing its line
    // count, so physical lines are counted from byte offsets instead.
    let bytes = content.as_bytes();
    let mut counted_to = 0;
    let mut line = 1;

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        let start = record.position().map_or(counted_to, |p| p.byte() as usize);
        line += bytes[counted_to..start].iter().filter(|&&b| b == b'\n').count() as u64;
        counted_to = start;
        records.push((line, record));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[tokio::test]
    async fn delimited_reader_skips_blank_lines_and_keeps_quotes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "\u{feff}1;\"a\";b\n\n2;;c\r\n").unwrap();

        let records = read_delimited(file.path(), b';').await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].0, 1);
        assert_eq!(records[0].1.iter().collect::<Vec<_>>(), vec!["1", "\"a\"", "b"]);
        assert_eq!(records[1].0, 3);
        assert_eq!(records[1].1.iter().collect::<Vec<_>>(), vec!["2", "", "c"]);
    }

    #[tokio::test]
    async fn missing_file_names_the_path() {
        let err = read_delimited(Path::new("/nonexistent/hksarg_pr.csv"), b'\t')
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/hksarg_pr.csv"));
    }

    #[test]
    fn skip_policy_counts_rows() {
        let mut skipped = 0;
        let err = || AppError::malformed("f.csv", 3, "bad");
        assert!(MalformedRows::Fail.handle(err(), &mut skipped).is_err());
        assert!(MalformedRows::Skip.handle(err(), &mut skipped).is_ok());
        assert_eq!(skipped, 1);
    }
}
