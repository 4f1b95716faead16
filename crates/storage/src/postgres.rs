//! PostgreSQL sighting store.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::{
    postgres::{PgPoolOptions, PgRow},
    PgPool, Postgres, QueryBuilder, Row,
};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

use sighting_common::{
    AggregatedCell, DayCell, SightingError, SightingRecord, SightingResult, WeekCount,
};

use crate::query::{self, BuiltQuery, CellQuery, SpeciesFilter, TABLE_NAME};
use crate::store::SightingStore;

/// Seven binds per row; PostgreSQL allows at most 65535 per statement.
const ROWS_PER_INSERT: usize = 9000;

/// Sighting store backed by a PostgreSQL table.
pub struct PgSightingStore {
    pool: PgPool,
}

impl PgSightingStore {
    /// Connect eagerly; fails if the database is unreachable.
    pub async fn connect(database_url: &str, max_connections: u32) -> SightingResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| SightingError::DatabaseError(format!("Connection failed: {}", e)))?;

        Ok(Self { pool })
    }

    /// Create the pool without connecting. Connections are opened on first
    /// use, so the service can start while the database is down.
    pub fn connect_lazy(database_url: &str, max_connections: u32) -> SightingResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect_lazy(database_url)
            .map_err(|e| SightingError::DatabaseError(format!("Invalid database URL: {}", e)))?;

        Ok(Self { pool })
    }

    /// Create the sightings table and its indexes.
    pub async fn migrate(&self) -> SightingResult<()> {
        for statement in SCHEMA_SQL.split(';') {
            let trimmed = statement.trim();
            if !trimmed.is_empty() {
                sqlx::query(trimmed)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| SightingError::DatabaseError(format!("Migration failed: {}", e)))?;
            }
        }

        Ok(())
    }

    pub async fn table_exists(&self) -> SightingResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT to_regclass($1::text) IS NOT NULL")
            .bind(TABLE_NAME)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| SightingError::DatabaseError(format!("Query failed: {}", e)))?;

        Ok(exists)
    }

    pub async fn drop_table(&self) -> SightingResult<()> {
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", TABLE_NAME))
            .execute(&self.pool)
            .await
            .map_err(|e| SightingError::DatabaseError(format!("Drop failed: {}", e)))?;

        Ok(())
    }

    /// Insert a batch of records, split into statements that stay under the
    /// PostgreSQL bind parameter limit.
    pub async fn insert_batch(&self, records: &[SightingRecord]) -> SightingResult<u64> {
        let mut inserted = 0;
        for chunk in records.chunks(ROWS_PER_INSERT) {
            inserted += self.insert_chunk(chunk).await?;
        }
        Ok(inserted)
    }

    async fn insert_chunk(&self, records: &[SightingRecord]) -> SightingResult<u64> {
        let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "INSERT INTO {} (id, species_name, time, latitude, longitude, day_of_year, year) ",
            TABLE_NAME
        ));
        builder.push_values(records, |mut row, record| {
            row.push_bind(&record.id)
                .push_bind(&record.species)
                .push_bind(record.time)
                .push_bind(record.latitude)
                .push_bind(record.longitude)
                .push_bind(record.day_of_year as i32)
                .push_bind(record.year);
        });

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| SightingError::DatabaseError(format!("Insert failed: {}", e)))?;

        Ok(result.rows_affected())
    }

    async fn fetch_rows(&self, built: &BuiltQuery) -> SightingResult<Vec<PgRow>> {
        debug!(sql = %built.sql, binds = built.binds.len(), "Executing aggregate query");

        let mut q = sqlx::query(&built.sql);
        for value in &built.binds {
            q = q.bind(value);
        }

        q.fetch_all(&self.pool)
            .await
            .map_err(|e| SightingError::DatabaseError(format!("Query failed: {}", e)))
    }
}

#[async_trait]
impl SightingStore for PgSightingStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> SightingResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| SightingError::DatabaseError(format!("Ping failed: {}", e)))?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn distinct_species(&self) -> SightingResult<Vec<String>> {
        let rows = self.fetch_rows(&query::distinct_species()).await?;
        rows.iter()
            .map(|row| row.try_get::<String, _>("species_name").map_err(decode_error))
            .collect()
    }

    #[instrument(skip(self))]
    async fn species_counts(&self) -> SightingResult<BTreeMap<String, u64>> {
        let rows = self.fetch_rows(&query::species_counts()).await?;
        let mut counts = BTreeMap::new();
        for row in &rows {
            let name: String = row.try_get("species_name").map_err(decode_error)?;
            let count: i64 = row.try_get("count").map_err(decode_error)?;
            counts.insert(name, count.max(0) as u64);
        }
        Ok(counts)
    }

    #[instrument(skip(self))]
    async fn aggregate_cells(&self, query: &CellQuery) -> SightingResult<Vec<AggregatedCell>> {
        let rows = self.fetch_rows(&query.build()).await?;
        rows.iter().map(|row| decode_cell(row, query)).collect()
    }

    #[instrument(skip(self))]
    async fn weekly_counts(&self, filter: &SpeciesFilter) -> SightingResult<Vec<WeekCount>> {
        let rows = self.fetch_rows(&query::weekly_counts(filter)).await?;
        rows.iter()
            .map(|row| {
                let week: NaiveDate = row.try_get("week").map_err(decode_error)?;
                let count: i64 = row.try_get("count").map_err(decode_error)?;
                Ok(WeekCount {
                    week,
                    count: count.max(0) as u64,
                })
            })
            .collect()
    }

    #[instrument(skip(self))]
    async fn day_cells(&self, filter: &SpeciesFilter) -> SightingResult<Vec<DayCell>> {
        let rows = self.fetch_rows(&query::day_cells(filter)).await?;
        rows.iter()
            .map(|row| {
                let day: i32 = row.try_get("day_of_year").map_err(decode_error)?;
                let count: i64 = row.try_get("count").map_err(decode_error)?;
                Ok(DayCell {
                    latitude: row.try_get("latitude").map_err(decode_error)?,
                    longitude: row.try_get("longitude").map_err(decode_error)?,
                    day_of_year: day.max(0) as u32,
                    count: count.max(0) as u64,
                })
            })
            .collect()
    }
}

fn decode_cell(row: &PgRow, query: &CellQuery) -> SightingResult<AggregatedCell> {
    let count: i64 = row.try_get("count").map_err(decode_error)?;
    let earliest: NaiveDateTime = row.try_get("earliest").map_err(decode_error)?;
    let latest: NaiveDateTime = row.try_get("latest").map_err(decode_error)?;

    let mut cell = AggregatedCell::new(
        row.try_get("latitude").map_err(decode_error)?,
        row.try_get("longitude").map_err(decode_error)?,
        count.max(0) as u64,
        row.try_get("species").map_err(decode_error)?,
        earliest,
        latest,
    )?;

    if query.min_day {
        let min_day: i32 = row.try_get("min_day").map_err(decode_error)?;
        cell = cell.with_min_day(min_day.max(0) as u32);
    }
    if query.count_species.is_some() {
        let species_count: i64 = row.try_get("species_count").map_err(decode_error)?;
        cell = cell.with_species_count(species_count.max(0) as u64);
    }

    Ok(cell)
}

fn decode_error(e: sqlx::Error) -> SightingError {
    SightingError::InvalidRow(e.to_string())
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS species_sightings (
    id TEXT NOT NULL,
    species_name TEXT NOT NULL,
    time TIMESTAMP NOT NULL,
    latitude DOUBLE PRECISION NOT NULL,
    longitude DOUBLE PRECISION NOT NULL,
    day_of_year INTEGER NOT NULL,
    year INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sightings_species_cell ON species_sightings(species_name, latitude, longitude);
CREATE INDEX IF NOT EXISTS idx_sightings_time ON species_sightings(time)
"#;
