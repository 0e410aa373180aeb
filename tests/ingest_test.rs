//! End-to-end loads against temporary data directories.

use anyhow::Result;
use outbreak_loader::db::Repository;
use outbreak_loader::ingest::{load_press_releases, MalformedRows};
use outbreak_loader::{AppError, Config, Loader};
use tempfile::TempDir;

const BOUNDARIES: &str = "\
OBJECTID;ADMIN_TYPE;ADM2_CAP;ADM2_EN;ADM2_ZH;ADM2_PCODE;ADM1_EN;ADM1_ZH;ADM1_PCODE;ADM0_EN;ADM0_ZH;ADM0_PCODE
1;Prefecture;广州市;Guangzhou;广州市;CN044001;Guangdong;广东省;CN044;China;中国;CN
2;Prefecture;深圳市;Shenzhen;深圳市;CN044003;Guangdong;广东省;CN044;China;中国;CN
3;Prefecture;武汉市;Wuhan;武汉市;CN042001;Hubei;湖北省;CN042;China;中国;CN
";

const SNAPSHOT: &str = r#"[
  {
    "provinceName": "广东",
    "provinceShortName": "广东",
    "confirmedCount": 12,
    "suspectedCount": 0,
    "curedCount": 1,
    "deadCount": 0,
    "comment": "",
    "cities": [
      {"cityName": "广州", "confirmedCount": 7, "suspectedCount": 0, "curedCount": 1, "deadCount": 0},
      {"cityName": "深圳", "confirmedCount": 5, "suspectedCount": 0, "curedCount": 0, "deadCount": 0}
    ]
  }
]"#;

/// A data directory laid out like a real download, plus a config pointing at it.
fn fixture(press_releases: &str) -> Result<(TempDir, Config)> {
    let dir = tempfile::tempdir()?;
    let data_dir = dir.path().join("data");
    std::fs::create_dir_all(&data_dir)?;
    std::fs::write(data_dir.join("hksarg_pr.csv"), press_releases)?;
    std::fs::write(data_dir.join("20200201_120000_getAreaStat.json"), SNAPSHOT)?;
    std::fs::write(dir.path().join("boundaries.csv"), BOUNDARIES)?;

    let config = Config {
        data_dir,
        boundary_path: dir.path().join("boundaries.csv"),
        db_path: dir.path().join("outbreak.sqlite"),
        ..Config::default()
    };
    Ok((dir, config))
}

async fn text_column(repo: &Repository, query: &str) -> Result<Vec<Option<String>>> {
    Ok(repo.array_from_query::<Option<String>>(query).await?)
}

#[tokio::test]
async fn full_rebuild_loads_every_source() -> Result<()> {
    let (_dir, config) = fixture("1/2/2020 10:30\t5\t100\t80\t20\t\t\t90\t2\n")?;
    let loader = Loader::open(config).await?;

    let report = loader.run().await?.expect("full rebuild");
    assert_eq!(report.press_releases.stats.inserted, 1);
    assert_eq!(report.places.stats.inserted, 3);
    assert_eq!(report.snapshots.files, 1);
    assert_eq!(report.snapshots.provinces.inserted, 1);
    assert_eq!(report.snapshots.cities.inserted, 2);
    assert_eq!(report.table_rows.len(), 5);

    let repo = loader.repository();
    let rows = repo
        .rows_from_query(
            "SELECT Timestamp, New, Total, Cured, Remain, Stable, Serious, Confirmed, Dead FROM [hksarg_pr]",
        )
        .await?;
    assert_eq!(rows.len(), 1);
    let row: Vec<String> = rows[0]
        .iter()
        .map(|value| match value {
            rusqlite::types::Value::Integer(n) => n.to_string(),
            rusqlite::types::Value::Text(s) => s.clone(),
            other => format!("{:?}", other),
        })
        .collect();
    assert_eq!(
        row,
        vec!["2020-02-01 10:30:00", "5", "100", "80", "20", "0", "0", "90", "2"]
    );

    let timestamps: Vec<i64> = repo
        .array_from_query(
            "SELECT Timestamp FROM [3g_dxy_cn_province] UNION ALL SELECT Timestamp FROM [3g_dxy_cn_city]",
        )
        .await?;
    assert_eq!(timestamps, vec![20200201120000; 3]);

    let province_en = text_column(repo, "SELECT Province_EN FROM [3g_dxy_cn_province]").await?;
    assert_eq!(province_en, vec![Some("Guangdong".to_string())]);

    let city_en = text_column(repo, "SELECT City_EN FROM [3g_dxy_cn_city] ORDER BY City_EN").await?;
    assert_eq!(
        city_en,
        vec![Some("Guangzhou".to_string()), Some("Shenzhen".to_string())]
    );

    loader.close().await?;
    Ok(())
}

#[tokio::test]
async fn rerunning_press_releases_is_a_no_op() -> Result<()> {
    let (_dir, config) = fixture("1/2/2020 10:30\t5\t100\t80\t20\t\t\t90\t2\n")?;
    let loader = Loader::open(config.clone()).await?;
    loader.run().await?;

    let repo = loader.repository();
    let again = load_press_releases(repo, &config.press_release_path(), MalformedRows::Fail).await?;
    assert_eq!(again.stats.inserted, 0);
    assert_eq!(again.stats.ignored, 1);
    assert_eq!(repo.count_rows("hksarg_pr").await?, 1);

    loader.close().await?;
    Ok(())
}

#[tokio::test]
async fn malformed_row_fails_the_load_by_default() -> Result<()> {
    let (_dir, config) = fixture("1/2/2020 10:30\t5\t-1\t80\t20\t\t\t90\t2\n")?;
    let loader = Loader::open(config).await?;

    let err = loader.run().await.unwrap_err();
    assert!(matches!(err, AppError::Malformed { line: 1, .. }));

    loader.close().await?;
    Ok(())
}

#[tokio::test]
async fn malformed_row_after_blank_line_reports_physical_line() -> Result<()> {
    let (_dir, config) = fixture(
        "1/2/2020 10:30\t5\t100\t80\t20\t\t\t90\t2\n\
         \n\
         2/2/2020 10:30\t5\t-1\t80\t20\t\t\t90\t2\n",
    )?;
    let loader = Loader::open(config).await?;

    let err = loader.run().await.unwrap_err();
    assert!(matches!(err, AppError::Malformed { line: 3, .. }), "{err}");

    loader.close().await?;
    Ok(())
}

#[tokio::test]
async fn malformed_row_can_be_skipped() -> Result<()> {
    let (_dir, mut config) = fixture(
        "1/2/2020 10:30\t5\t100\t80\t20\t\t\t90\t2\n\
         2/2/2020 10:30\tn/a\t100\t80\t20\t\t\t90\t2\n\
         3/2/2020 10:30\t7\t107\t80\t27\t1\t1\t1\t95\t3\n",
    )?;
    config.skip_malformed_rows = true;
    let loader = Loader::open(config).await?;

    let report = loader.run().await?.expect("full rebuild");
    assert_eq!(report.press_releases.stats.inserted, 2);
    assert_eq!(report.press_releases.skipped, 1);

    let critical: Option<i64> = loader
        .repository()
        .value_from_query("SELECT Critical FROM [hksarg_pr] WHERE Timestamp = '2020-02-03 10:30:00'")
        .await?;
    assert_eq!(critical, Some(1));

    loader.close().await?;
    Ok(())
}

#[tokio::test]
async fn duplicate_boundary_id_is_fatal() -> Result<()> {
    let (dir, config) = fixture("1/2/2020 10:30\t5\t100\t80\t20\t\t\t90\t2\n")?;
    let duplicated = format!(
        "{}1;Prefecture;珠海市;Zhuhai;珠海市;CN044004;Guangdong;广东省;CN044;China;中国;CN\n",
        BOUNDARIES
    );
    std::fs::write(dir.path().join("boundaries.csv"), duplicated)?;

    let loader = Loader::open(config).await?;
    let err = loader.run().await.unwrap_err();
    assert!(matches!(err, AppError::Connection(_) | AppError::Database(_)));
    assert_eq!(loader.repository().count_rows("china_places").await?, 0);

    loader.close().await?;
    Ok(())
}

#[tokio::test]
async fn update_mode_leaves_database_untouched() -> Result<()> {
    let (_dir, config) = fixture("1/2/2020 10:30\t5\t100\t80\t20\t\t\t90\t2\n")?;

    let loader = Loader::open(config.clone()).await?;
    loader.run().await?;
    loader.close().await?;

    let update = Config {
        first_run: false,
        ..config
    };
    let loader = Loader::open(update).await?;
    assert!(loader.run().await?.is_none());
    assert_eq!(loader.repository().count_rows("3g_dxy_cn_city").await?, 2);

    loader.close().await?;
    Ok(())
}

#[tokio::test]
async fn rebuild_replaces_previous_tables() -> Result<()> {
    let (_dir, config) = fixture("1/2/2020 10:30\t5\t100\t80\t20\t\t\t90\t2\n")?;

    let repo = Repository::open(&config.db_path).await?;
    repo.execute("CREATE TABLE leftover (id Int)").await?;
    let loader = Loader::with_repository(config, repo);

    loader.run().await?;
    let tables = loader.repository().table_names().await?;
    assert!(!tables.iter().any(|t| t == "leftover"));
    assert_eq!(loader.repository().count_rows("china_places").await?, 3);

    loader.close().await?;
    Ok(())
}

#[tokio::test]
async fn missing_press_release_file_is_reported() -> Result<()> {
    let (dir, config) = fixture("")?;
    std::fs::remove_file(config.press_release_path())?;

    let loader = Loader::open(config).await?;
    let err = loader.run().await.unwrap_err();
    match err {
        AppError::Read { path, .. } => {
            assert_eq!(path, dir.path().join("data").join("hksarg_pr.csv"));
        }
        other => panic!("unexpected error: {other}"),
    }

    loader.close().await?;
    Ok(())
}
