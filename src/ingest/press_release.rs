//! Tab-separated daily figures from the Hong Kong SAR government press releases.

use std::path::Path;
use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

use super::normalize::classify_all;
use super::{read_delimited, MalformedRows, Parsed, SourceReport};
use crate::db::Repository;
use crate::error::{AppError, Result};
use crate::models::PressRelease;

/// Counts per row in the current layout (with `Critical`).
const FULL_LAYOUT: usize = 9;
/// Counts per row in the early layout, before critical cases were reported.
const EARLY_LAYOUT: usize = 8;

static DATE_SPLIT_RE: OnceLock<Regex> = OnceLock::new();

fn date_split_re() -> &'static Regex {
    DATE_SPLIT_RE.get_or_init(|| Regex::new(r"[/: ]").expect("valid date separator pattern"))
}

/// Parse a `D/M/Y H:M` release time. Fields are taken by position:
/// day, month, year, hour, minute.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let parts: Vec<&str> = date_split_re().split(value.trim()).collect();
    let [day, month, year, hour, minute] = parts.as_slice() else {
        return None;
    };

    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)?
        .and_hms_opt(hour.parse().ok()?, minute.parse().ok()?, 0)
}

/// Map one split line onto a [`PressRelease`].
pub fn parse_record(values: &[&str]) -> std::result::Result<PressRelease, String> {
    let (date, rest) = values
        .split_first()
        .ok_or_else(|| "empty line".to_string())?;
    let timestamp =
        parse_timestamp(date).ok_or_else(|| format!("invalid release time {:?}", date))?;

    let fields = classify_all(rest.iter().copied()).map_err(|e| e.to_string())?;
    let mut counts = fields
        .iter()
        .map(|field| {
            field
                .as_count()
                .ok_or_else(|| format!("expected a count, found {}", field))
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    if counts.len() == EARLY_LAYOUT {
        counts.insert(6, 0);
    }
    let [new, total, cured, remain, stable, serious, critical, confirmed, dead]: [i64; FULL_LAYOUT] =
        counts.try_into().map_err(|counts: Vec<i64>| {
            format!(
                "expected {} or {} counts, found {}",
                EARLY_LAYOUT,
                FULL_LAYOUT,
                counts.len()
            )
        })?;

    Ok(PressRelease {
        timestamp,
        new,
        total,
        cured,
        remain,
        stable,
        serious,
        critical,
        confirmed,
        dead,
    })
}

pub async fn read_press_releases(path: &Path, policy: MalformedRows) -> Result<Parsed<PressRelease>> {
    let mut records = Vec::new();
    let mut skipped = 0;

    for (line, record) in read_delimited(path, b'\t').await? {
        let values: Vec<&str> = record.iter().collect();
        match parse_record(&values) {
            Ok(release) => records.push(release),
            Err(reason) => policy.handle(AppError::malformed(path, line, reason), &mut skipped)?,
        }
    }

    Ok(Parsed { records, skipped })
}

/// Load the press-release file. Timestamps already present are left untouched.
pub async fn load_press_releases(
    repository: &Repository,
    path: &Path,
    policy: MalformedRows,
) -> Result<SourceReport> {
    tracing::info!("Reading press releases from {}", path.display());
    let parsed = read_press_releases(path, policy).await?;
    let stats = repository.insert_press_releases(&parsed.records).await?;

    if stats.ignored > 0 {
        tracing::info!("{} press releases were already loaded", stats.ignored);
    }

    Ok(SourceReport {
        stats,
        skipped: parsed.skipped,
    })
}
