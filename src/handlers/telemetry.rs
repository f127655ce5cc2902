//! HTTP handlers for the telemetry CRUD surface.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde_json::json;

use crate::error::AppError;
use crate::models::telemetry::{ListQuery, NewTelemetry, Pagination, Sorting, TelemetryPage, TelemetryRecord};
use crate::repository::telemetry::{ListParams, TelemetryRepository};

/// State shared across all telemetry handlers.
#[derive(Clone)]
pub struct AppState {
    pub repository: TelemetryRepository,
}

/// GET /telemetry - list readings with filtering, sorting, and pagination.
///
/// Invalid pagination or sorting input never fails the request; it is
/// coerced to the documented defaults, and the resolved values are
/// reported back alongside the data.
pub async fn list_telemetry(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<TelemetryPage>, AppError> {
    let params = ListParams::from(query);
    let (data, total) = state.repository.list(&params).await?;

    Ok(Json(TelemetryPage {
        data,
        pagination: Pagination::new(params.page, params.per_page, total),
        sorting: Sorting {
            sort_by: params.sort_by.as_str(),
            sort_order: params.sort_order.as_str(),
        },
    }))
}

/// GET /telemetry/{id} - fetch a single reading.
pub async fn get_telemetry(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TelemetryRecord>, AppError> {
    match state.repository.get(id).await? {
        Some(record) => Ok(Json(record)),
        None => Err(AppError::entry_not_found()),
    }
}

/// POST /telemetry - validate and persist a new reading.
pub async fn create_telemetry(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let reading = NewTelemetry::from_payload(&payload)?;
    let id = state.repository.insert(&reading).await?;

    tracing::info!(id, satellite_id = %reading.satellite_id, "Telemetry entry added");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": id, "message": "Telemetry entry added" })),
    ))
}

/// DELETE /telemetry/{id} - remove a reading if it exists.
pub async fn delete_telemetry(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    if state.repository.delete(id).await? {
        tracing::info!(id, "Telemetry entry deleted");
        Ok(Json(json!({ "message": "Telemetry entry deleted" })))
    } else {
        Err(AppError::entry_not_found())
    }
}
