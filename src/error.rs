use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Rejected client input on a write path; the message names the
    /// violated rule so the caller can correct the request.
    #[error("{0}")]
    Validation(String),
    /// Lookup or delete against an id that does not exist.
    #[error("{0}")]
    NotFound(String),
    /// Store-layer failure; not recovered locally.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    /// The not-found condition shared by get-by-id and delete-by-id.
    pub fn entry_not_found() -> Self {
        Self::NotFound("Telemetry entry not found".to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Database(err) => {
                tracing::error!(error = %err, "Store call failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = AppError::Validation("Altitude and velocity must be numeric.".to_string());
        assert_eq!(error.to_string(), "Altitude and velocity must be numeric.");

        assert_eq!(
            AppError::entry_not_found().to_string(),
            "Telemetry entry not found"
        );
    }

    #[tokio::test]
    async fn test_validation_error_response() {
        let error = AppError::Validation("Missing required field: status".to_string());
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_not_found_error_response() {
        let response = AppError::entry_not_found().into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_database_error_hides_details() {
        let error = AppError::Database(sqlx::Error::PoolClosed);
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
