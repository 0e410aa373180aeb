use std::collections::HashMap;
use std::hash::Hash;
use std::path::Path;

use rusqlite::params_from_iter;
use rusqlite::types::{FromSql, Value};
use tokio_rusqlite::Connection;

use crate::error::Result;
use crate::ingest::normalize::{render_list, Field};
use crate::models::{Place, PressRelease, Snapshot};

use super::schema::{
    TableDefinition, INSERT_CITY, INSERT_PLACE, INSERT_PRESS_RELEASE, INSERT_PROVINCE,
    SELECT_TABLE_NAMES,
};

/// Rows written by one batch. `ignored` counts rows dropped by `INSERT OR IGNORE`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertStats {
    pub inserted: usize,
    pub ignored: usize,
}

impl std::ops::AddAssign for InsertStats {
    fn add_assign(&mut self, other: Self) {
        self.inserted += other.inserted;
        self.ignored += other.ignored;
    }
}

struct Batch {
    statement: &'static str,
    rows: Vec<Vec<Field>>,
}

pub struct Repository {
    conn: Connection,
}

impl Repository {
    pub async fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(db_path.as_ref()).await?;
        Ok(Self { conn })
    }

    pub async fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().await?;
        Ok(Self { conn })
    }

    pub async fn close(self) -> Result<()> {
        self.conn.close().await?;
        Ok(())
    }

    // Generic query helpers

    /// Run a single statement, returning the number of changed rows.
    pub async fn execute(&self, command: &str) -> Result<usize> {
        tracing::debug!("{}", command);
        let command = command.to_string();
        let changed = self
            .conn
            .call(move |conn| Ok(conn.execute(&command, [])?))
            .await?;
        Ok(changed)
    }

    /// Every row of the result, each as a list of dynamically typed values.
    pub async fn rows_from_query(&self, query: &str) -> Result<Vec<Vec<Value>>> {
        let query = query.to_string();
        let rows = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&query)?;
                let width = stmt.column_count();
                let rows = stmt
                    .query_map([], |row| {
                        (0..width)
                            .map(|i| row.get::<_, Value>(i))
                            .collect::<rusqlite::Result<Vec<_>>>()
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await?;
        Ok(rows)
    }

    /// First column of every row.
    pub async fn array_from_query<T>(&self, query: &str) -> Result<Vec<T>>
    where
        T: FromSql + Send + 'static,
    {
        let query = query.to_string();
        let values = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&query)?;
                let values = stmt
                    .query_map([], |row| row.get::<_, T>(0))?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(values)
            })
            .await?;
        Ok(values)
    }

    /// First two columns as a key/value map. Later rows win on repeated keys.
    pub async fn dict_from_query<K, V>(&self, query: &str) -> Result<HashMap<K, V>>
    where
        K: FromSql + Eq + Hash + Send + 'static,
        V: FromSql + Send + 'static,
    {
        let query = query.to_string();
        let map = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&query)?;
                let map = stmt
                    .query_map([], |row| Ok((row.get::<_, K>(0)?, row.get::<_, V>(1)?)))?
                    .collect::<std::result::Result<HashMap<_, _>, _>>()?;
                Ok(map)
            })
            .await?;
        Ok(map)
    }

    /// First column of the first row, if any.
    pub async fn value_from_query<T>(&self, query: &str) -> Result<Option<T>>
    where
        T: FromSql + Send + 'static,
    {
        tracing::debug!("{}", query);
        let values = self.array_from_query::<T>(query).await?;
        Ok(values.into_iter().next())
    }

    // Schema

    pub async fn table_names(&self) -> Result<Vec<String>> {
        self.array_from_query(SELECT_TABLE_NAMES).await
    }

    pub async fn drop_all_tables(&self) -> Result<()> {
        tracing::info!("Dropping tables...");
        for table in self.table_names().await? {
            self.execute(&format!("DROP TABLE IF EXISTS [{}]", table))
                .await?;
        }
        Ok(())
    }

    /// Drop and recreate every listed table.
    pub async fn create_tables_from_definitions(&self, definitions: &[TableDefinition]) -> Result<()> {
        tracing::info!("Building {} tables...", definitions.len());
        for table in definitions {
            self.execute(&format!("DROP TABLE IF EXISTS [{}]", table.name))
                .await?;
            self.execute(&format!("CREATE TABLE [{}] ({})", table.name, table.columns))
                .await?;
        }
        Ok(())
    }

    pub async fn count_rows(&self, table: &str) -> Result<i64> {
        let count = self
            .value_from_query::<i64>(&format!("SELECT COUNT(*) FROM [{}]", table))
            .await?;
        Ok(count.unwrap_or(0))
    }

    // Loads. Each call is one transaction.

    pub async fn insert_press_releases(&self, records: &[PressRelease]) -> Result<InsertStats> {
        let rows = records.iter().map(PressRelease::fields).collect();
        let stats = self
            .insert_batches(vec![Batch {
                statement: INSERT_PRESS_RELEASE,
                rows,
            }])
            .await?;
        Ok(stats[0])
    }

    /// Plain insert: a repeated `OBJECTID` fails the whole batch.
    pub async fn insert_places(&self, places: &[Place]) -> Result<usize> {
        let rows = places.iter().map(Place::fields).collect();
        let stats = self
            .insert_batches(vec![Batch {
                statement: INSERT_PLACE,
                rows,
            }])
            .await?;
        Ok(stats[0].inserted)
    }

    /// Provinces then cities of one snapshot, in a single transaction.
    pub async fn insert_snapshot(&self, snapshot: &Snapshot) -> Result<(InsertStats, InsertStats)> {
        let provinces = Batch {
            statement: INSERT_PROVINCE,
            rows: snapshot.provinces.iter().map(|p| p.fields()).collect(),
        };
        let cities = Batch {
            statement: INSERT_CITY,
            rows: snapshot.cities.iter().map(|c| c.fields()).collect(),
        };
        let stats = self.insert_batches(vec![provinces, cities]).await?;
        Ok((stats[0], stats[1]))
    }

    async fn insert_batches(&self, batches: Vec<Batch>) -> Result<Vec<InsertStats>> {
        let stats = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                let mut all_stats = Vec::with_capacity(batches.len());
                for batch in &batches {
                    let head = statement_head(batch.statement);
                    let mut stats = InsertStats::default();
                    let mut stmt = tx.prepare_cached(batch.statement)?;
                    for row in &batch.rows {
                        tracing::debug!("{} VALUES ({})", head, render_list(row));
                        if stmt.execute(params_from_iter(row.iter()))? == 0 {
                            stats.ignored += 1;
                        } else {
                            stats.inserted += 1;
                        }
                    }
                    all_stats.push(stats);
                }
                tx.commit()?;
                Ok(all_stats)
            })
            .await?;
        Ok(stats)
    }
}

/// The statement up to its `VALUES` clause, on one line.
fn statement_head(statement: &str) -> String {
    let head = statement.split("VALUES").next().unwrap_or(statement);
    head.split_whitespace().collect::<Vec<_>>().join(" ")
}
