use std::fmt;

use crate::config::Config;
use crate::db::schema::TABLE_DEFINITIONS;
use crate::db::Repository;
use crate::error::Result;
use crate::ingest::snapshot::SnapshotReport;
use crate::ingest::{load_boundaries, load_press_releases, load_snapshots, PlaceIndex, SourceReport};

/// Summary of a full rebuild.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub press_releases: SourceReport,
    pub places: SourceReport,
    pub snapshots: SnapshotReport,
    /// Row count per table after the load, in schema order.
    pub table_rows: Vec<(String, i64)>,
}

impl fmt::Display for IngestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} press releases ({} already present, {} skipped), {} places, \
             {} snapshot files ({} provinces, {} cities)",
            self.press_releases.stats.inserted,
            self.press_releases.stats.ignored,
            self.press_releases.skipped,
            self.places.stats.inserted,
            self.snapshots.files,
            self.snapshots.provinces.inserted,
            self.snapshots.cities.inserted,
        )
    }
}

/// Runs the readers against one database for one configuration.
pub struct Loader {
    config: Config,
    repository: Repository,
}

impl Loader {
    pub async fn open(config: Config) -> Result<Self> {
        tracing::info!("Opening database {}", config.db_path.display());
        let repository = Repository::open(&config.db_path).await?;
        Ok(Self::with_repository(config, repository))
    }

    pub fn with_repository(config: Config, repository: Repository) -> Self {
        Self { config, repository }
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    /// Full rebuild when `first_run` is set. Update mode has no loader and
    /// returns `None` without touching the database.
    pub async fn run(&self) -> Result<Option<IngestReport>> {
        if !self.config.first_run {
            tracing::info!("Update mode: no incremental load is available, nothing to do");
            return Ok(None);
        }
        self.rebuild().await.map(Some)
    }

    pub async fn rebuild(&self) -> Result<IngestReport> {
        let policy = self.config.malformed_rows();

        self.repository.drop_all_tables().await?;
        self.repository
            .create_tables_from_definitions(TABLE_DEFINITIONS)
            .await?;

        let press_releases = load_press_releases(
            &self.repository,
            &self.config.press_release_path(),
            policy,
        )
        .await?;

        let places =
            load_boundaries(&self.repository, &self.config.boundary_path, policy).await?;

        let place_index = PlaceIndex::load(&self.repository).await?;
        let snapshots =
            load_snapshots(&self.repository, &self.config.data_dir, &place_index).await?;

        let mut table_rows = Vec::with_capacity(TABLE_DEFINITIONS.len());
        for table in TABLE_DEFINITIONS {
            let count = self.repository.count_rows(table.name).await?;
            tracing::info!("{}: {} rows", table.name, count);
            table_rows.push((table.name.to_string(), count));
        }

        Ok(IngestReport {
            press_releases,
            places,
            snapshots,
            table_rows,
        })
    }

    pub async fn close(self) -> Result<()> {
        self.repository.close().await
    }
}
