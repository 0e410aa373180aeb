//! Semicolon-separated OCHA administrative boundaries (`chn_admbnda_adm2_ocha.csv`).

use std::path::Path;

use super::{read_delimited, MalformedRows, Parsed, SourceReport};
use crate::db::{InsertStats, Repository};
use crate::error::{AppError, Result};
use crate::models::Place;

pub fn parse_record(values: &[&str]) -> std::result::Result<Place, String> {
    if values.len() != Place::COLUMN_COUNT {
        return Err(format!(
            "expected {} columns, found {}",
            Place::COLUMN_COUNT,
            values.len()
        ));
    }

    let object_id = values[0]
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("invalid OBJECTID {:?}", values[0]))?;

    Place::from_columns(object_id, &values[1..])
        .ok_or_else(|| "column count mismatch".to_string())
}

/// The OCHA export starts with the column names.
fn is_header(values: &[&str]) -> bool {
    values
        .first()
        .is_some_and(|first| first.trim().eq_ignore_ascii_case("OBJECTID"))
}

pub async fn read_boundaries(path: &Path, policy: MalformedRows) -> Result<Parsed<Place>> {
    let mut records = Vec::new();
    let mut skipped = 0;

    for (index, (line, record)) in read_delimited(path, b';').await?.into_iter().enumerate() {
        let values: Vec<&str> = record.iter().collect();

        // Export header, e.g. "OBJECTID;ADMIN_TYPE;..."
        if index == 0 && is_header(&values) {
            tracing::debug!("Skipping header line of {}", path.display());
            continue;
        }

        match parse_record(&values) {
            Ok(place) => records.push(place),
            Err(reason) => policy.handle(AppError::malformed(path, line, reason), &mut skipped)?,
        }
    }

    Ok(Parsed { records, skipped })
}

/// Load the reference table. It is loaded once per rebuild, so a repeated
/// `OBJECTID` is an error and nothing from the file is kept.
pub async fn load_boundaries(
    repository: &Repository,
    path: &Path,
    policy: MalformedRows,
) -> Result<SourceReport> {
    tracing::info!("Reading administrative boundaries from {}", path.display());
    let parsed = read_boundaries(path, policy).await?;
    let inserted = repository.insert_places(&parsed.records).await?;

    Ok(SourceReport {
        stats: InsertStats {
            inserted,
            ignored: 0,
        },
        skipped: parsed.skipped,
    })
}
