//! Query construction and persistence for telemetry readings.
//!
//! All literal values travel as bound parameters. The only dynamic SQL
//! fragments are the equality filters and the ORDER BY column and
//! direction, and the latter two can only come out of the `SortColumn`
//! and `SortOrder` allow-lists.

use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::telemetry::{ListQuery, NewTelemetry, TelemetryRecord};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 20;
pub const MAX_PER_PAGE: i64 = 100;

/// Columns a listing may be ordered by.
///
/// The enum is the allow-list: request input that does not match one of
/// these names exactly falls back to `Id`, so arbitrary identifiers
/// never reach the ORDER BY clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Id,
    SatelliteId,
    Timestamp,
    Altitude,
    Velocity,
    Status,
}

impl SortColumn {
    fn from_param(value: &str) -> Option<Self> {
        match value {
            "id" => Some(Self::Id),
            "satelliteId" => Some(Self::SatelliteId),
            "timestamp" => Some(Self::Timestamp),
            "altitude" => Some(Self::Altitude),
            "velocity" => Some(Self::Velocity),
            "status" => Some(Self::Status),
            _ => None,
        }
    }

    /// Column name; doubles as the wire name in the `sorting` block.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::SatelliteId => "satelliteId",
            Self::Timestamp => "timestamp",
            Self::Altitude => "altitude",
            Self::Velocity => "velocity",
            Self::Status => "status",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    fn from_param(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Resolved list parameters.
///
/// Invalid raw input degrades to the documented defaults instead of
/// failing, so every request yields a page.
#[derive(Debug, Clone, PartialEq)]
pub struct ListParams {
    pub satellite_id: Option<String>,
    pub status: Option<String>,
    pub page: i64,
    pub per_page: i64,
    pub sort_by: SortColumn,
    pub sort_order: SortOrder,
}

impl From<ListQuery> for ListParams {
    fn from(query: ListQuery) -> Self {
        let page = query
            .page
            .as_deref()
            .and_then(parse_i64)
            .unwrap_or(DEFAULT_PAGE)
            .max(1);

        let per_page = query
            .per_page
            .as_deref()
            .and_then(parse_i64)
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE);

        let sort_by = query
            .sort_by
            .as_deref()
            .and_then(SortColumn::from_param)
            .unwrap_or(SortColumn::Id);

        let sort_order = query
            .sort_order
            .as_deref()
            .and_then(SortOrder::from_param)
            .unwrap_or(SortOrder::Asc);

        Self {
            // An empty value deactivates the filter.
            satellite_id: query.satellite_id.filter(|s| !s.is_empty()),
            status: query.status.filter(|s| !s.is_empty()),
            page,
            per_page,
            sort_by,
            sort_order,
        }
    }
}

fn parse_i64(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

const SELECT_COLUMNS: &str = "id, satelliteId AS satellite_id, timestamp, altitude, velocity, status";

/// Persistence layer for telemetry readings.
///
/// Holds the shared pool; each statement checks a connection out and
/// hands it back when the call returns, so no connection outlives an
/// operation.
#[derive(Clone)]
pub struct TelemetryRepository {
    pool: SqlitePool,
}

impl TelemetryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Count the rows matching the active filters, then fetch the page.
    ///
    /// The two statements are independent; a concurrent writer can land
    /// between them, so the count and the page are not guaranteed to
    /// come from the same snapshot.
    pub async fn list(&self, params: &ListParams) -> Result<(Vec<TelemetryRecord>, i64), AppError> {
        let mut filters = String::new();
        if params.satellite_id.is_some() {
            filters.push_str(" AND satelliteId = ?");
        }
        if params.status.is_some() {
            filters.push_str(" AND status = ?");
        }

        let count_sql = format!("SELECT COUNT(*) FROM telemetry WHERE 1=1{}", filters);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(satellite_id) = &params.satellite_id {
            count_query = count_query.bind(satellite_id);
        }
        if let Some(status) = &params.status {
            count_query = count_query.bind(status);
        }
        let total = count_query.fetch_one(&self.pool).await?;

        let page_sql = format!(
            "SELECT {} FROM telemetry WHERE 1=1{} ORDER BY {} {} LIMIT ? OFFSET ?",
            SELECT_COLUMNS,
            filters,
            params.sort_by.as_str(),
            params.sort_order.as_str(),
        );
        let mut page_query = sqlx::query_as::<_, TelemetryRecord>(&page_sql);
        if let Some(satellite_id) = &params.satellite_id {
            page_query = page_query.bind(satellite_id);
        }
        if let Some(status) = &params.status {
            page_query = page_query.bind(status);
        }
        let records = page_query
            .bind(params.per_page)
            .bind((params.page - 1) * params.per_page)
            .fetch_all(&self.pool)
            .await?;

        Ok((records, total))
    }

    pub async fn get(&self, id: i64) -> Result<Option<TelemetryRecord>, AppError> {
        let sql = format!("SELECT {} FROM telemetry WHERE id = ?", SELECT_COLUMNS);
        let record = sqlx::query_as::<_, TelemetryRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    /// Insert a validated reading and return the store-assigned id.
    pub async fn insert(&self, reading: &NewTelemetry) -> Result<i64, AppError> {
        let result = sqlx::query(
            "INSERT INTO telemetry (satelliteId, timestamp, altitude, velocity, status)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&reading.satellite_id)
        .bind(&reading.timestamp)
        .bind(reading.altitude)
        .bind(reading.velocity)
        .bind(&reading.status)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Delete one reading. Returns false when the id does not exist, in
    /// which case nothing was mutated.
    pub async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM telemetry WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
