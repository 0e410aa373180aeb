//! `getAreaStat` JSON dumps: one province → city tree of case counts per file.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use super::places::PlaceIndex;
use crate::db::{InsertStats, Repository};
use crate::error::{AppError, Result};
use crate::models::{AreaStat, CaseCounts, CitySnapshot, ProvinceSnapshot, Snapshot};

static AREA_STAT_RE: OnceLock<Regex> = OnceLock::new();

fn area_stat_re() -> &'static Regex {
    AREA_STAT_RE.get_or_init(|| {
        Regex::new(r"^([0-9]{8})_([0-9]{6})_getAreaStat\.json$").expect("valid file name pattern")
    })
}

/// A snapshot file and the `YYYYMMDDHHMMSS` timestamp from its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotFile {
    pub path: PathBuf,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotReport {
    pub files: usize,
    pub provinces: InsertStats,
    pub cities: InsertStats,
}

/// Timestamp encoded in a snapshot file name, if the name matches.
pub fn timestamp_from_file_name(name: &str) -> Option<i64> {
    let caps = area_stat_re().captures(name)?;
    format!("{}{}", &caps[1], &caps[2]).parse().ok()
}

/// Snapshot files in `dir`, sorted by name (and so by time).
pub async fn find_snapshot_files(dir: &Path) -> Result<Vec<SnapshotFile>> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| AppError::read(dir, e))?;

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let Some(timestamp) = name.to_str().and_then(timestamp_from_file_name) else {
            continue;
        };
        files.push(SnapshotFile {
            path: entry.path(),
            timestamp,
        });
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

/// Flatten parsed area statistics into table rows, resolving English names.
pub fn build_snapshot(timestamp: i64, areas: Vec<AreaStat>, places: &PlaceIndex) -> Snapshot {
    let mut snapshot = Snapshot {
        timestamp,
        ..Snapshot::default()
    };

    for area in areas {
        let province_en = places.province_en(&area.province_name).map(str::to_string);
        if province_en.is_none() {
            tracing::debug!("No English name for province {}", area.province_name);
        }

        for city in area.cities {
            let city_en = places.city_en(&city.city_name).map(str::to_string);
            snapshot.cities.push(CitySnapshot {
                timestamp,
                province_zh: area.province_name.clone(),
                province_en: province_en.clone(),
                city_zh: city.city_name,
                city_en,
                counts: CaseCounts {
                    confirmed: city.confirmed_count,
                    suspected: city.suspected_count,
                    cured: city.cured_count,
                    dead: city.dead_count,
                },
            });
        }

        snapshot.provinces.push(ProvinceSnapshot {
            timestamp,
            province_zh: area.province_name,
            province_en,
            counts: CaseCounts {
                confirmed: area.confirmed_count,
                suspected: area.suspected_count,
                cured: area.cured_count,
                dead: area.dead_count,
            },
            comment: area.comment.unwrap_or_default(),
        });
    }

    snapshot
}

pub async fn read_snapshot(file: &SnapshotFile, places: &PlaceIndex) -> Result<Snapshot> {
    let content = tokio::fs::read_to_string(&file.path)
        .await
        .map_err(|e| AppError::read(&file.path, e))?;
    let areas: Vec<AreaStat> = serde_json::from_str(&content).map_err(|e| AppError::Json {
        path: file.path.clone(),
        source: e,
    })?;

    tracing::debug!("{} provinces in {}", areas.len(), file.path.display());
    Ok(build_snapshot(file.timestamp, areas, places))
}

/// Load every snapshot file in `dir`, one transaction per file.
pub async fn load_snapshots(
    repository: &Repository,
    dir: &Path,
    places: &PlaceIndex,
) -> Result<SnapshotReport> {
    let files = find_snapshot_files(dir).await?;
    tracing::info!("Found {} snapshot files in {}", files.len(), dir.display());
    if places.is_empty() && !files.is_empty() {
        tracing::warn!("Place index is empty, English names will be left blank");
    }

    let mut report = SnapshotReport::default();
    for file in &files {
        tracing::info!("Reading snapshot {} ({})", file.path.display(), file.timestamp);
        let snapshot = read_snapshot(file, places).await?;
        let (provinces, cities) = repository.insert_snapshot(&snapshot).await?;

        let duplicates = provinces.ignored + cities.ignored;
        if duplicates > 0 {
            tracing::warn!(
                "Ignored {} duplicate places in {}",
                duplicates,
                file.path.display()
            );
        }

        report.files += 1;
        report.provinces += provinces;
        report.cities += cities;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CityStat;

    fn area(name: &str, cities: &[&str]) -> AreaStat {
        AreaStat {
            province_name: name.to_string(),
            confirmed_count: 10,
            suspected_count: 1,
            cured_count: 2,
            dead_count: 0,
            comment: None,
            cities: cities
                .iter()
                .map(|city| CityStat {
                    city_name: city.to_string(),
                    confirmed_count: 5,
                    suspected_count: 0,
                    cured_count: 1,
                    dead_count: 0,
                })
                .collect(),
        }
    }

    #[test]
    fn file_name_pattern() {
        assert_eq!(
            timestamp_from_file_name("20200201_120000_getAreaStat.json"),
            Some(20200201120000)
        );
        assert_eq!(timestamp_from_file_name("20200201_1200_getAreaStat.json"), None);
        assert_eq!(timestamp_from_file_name("20200201_120000_getAreaStat.json.bak"), None);
        assert_eq!(timestamp_from_file_name("x20200201_120000_getAreaStat.json"), None);
        assert_eq!(timestamp_from_file_name("20200201_120000_getListByCountryTypeService1.json"), None);
    }

    #[test]
    fn builds_rows_with_resolved_names() {
        let mut places = PlaceIndex::new();
        places.add_province("广东省", "Guangdong");
        places.add_city("广州市", "Guangzhou");

        let snapshot = build_snapshot(
            20200201120000,
            vec![area("广东", &["广州", "待明确地区"])],
            &places,
        );

        assert_eq!(snapshot.provinces.len(), 1);
        assert_eq!(snapshot.cities.len(), 2);

        let province = &snapshot.provinces[0];
        assert_eq!(province.id(), "20200201120000_广东");
        assert_eq!(province.province_en.as_deref(), Some("Guangdong"));
        assert_eq!(province.comment, "");

        let city = &snapshot.cities[0];
        assert_eq!(city.id(), "20200201120000_广东_广州");
        assert_eq!(city.province_en.as_deref(), Some("Guangdong"));
        assert_eq!(city.city_en.as_deref(), Some("Guangzhou"));
        assert_eq!(snapshot.cities[1].city_en, None);
    }

    #[tokio::test]
    async fn scans_only_matching_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "20200202_080000_getAreaStat.json",
            "20200201_120000_getAreaStat.json",
            "20200201_120000_getStatisticsService.json",
            "hksarg_pr.csv",
        ] {
            std::fs::write(dir.path().join(name), "[]").unwrap();
        }

        let files = find_snapshot_files(dir.path()).await.unwrap();
        let timestamps: Vec<i64> = files.iter().map(|f| f.timestamp).collect();
        assert_eq!(timestamps, vec![20200201120000, 20200202080000]);
    }

    #[tokio::test]
    async fn invalid_json_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("20200201_120000_getAreaStat.json");
        std::fs::write(&path, "{ not json").unwrap();

        let file = SnapshotFile {
            path,
            timestamp: 20200201120000,
        };
        let err = read_snapshot(&file, &PlaceIndex::new()).await.unwrap_err();
        assert!(matches!(err, AppError::Json { .. }));
    }
}
