//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::OrderError;
use integrations::IntegrationError;
use ordering::WorkflowError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client.
    BadRequest(String),
    /// Workflow error.
    Workflow(WorkflowError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Workflow(err) => workflow_error_to_response(err),
        };

        let body = serde_json::json!({
            "error": message,
            "status_code": status.as_u16(),
        });
        (status, axum::Json(body)).into_response()
    }
}

fn workflow_error_to_response(err: WorkflowError) -> (StatusCode, String) {
    match &err {
        WorkflowError::Validation(_)
        | WorkflowError::CustomerInactive(_)
        | WorkflowError::InactiveProduct { .. }
        | WorkflowError::Amount(_) => (StatusCode::BAD_REQUEST, err.to_string()),

        WorkflowError::Order(order_err) => match order_err {
            OrderError::NotEditable { .. }
            | OrderError::InvalidStatusTransition { .. }
            | OrderError::NoItems => (StatusCode::BAD_REQUEST, err.to_string()),
        },

        WorkflowError::CustomerNotFound(_) | WorkflowError::OrderNotFound(_) => {
            (StatusCode::NOT_FOUND, err.to_string())
        }

        WorkflowError::Integration(integration_err) => match integration_err {
            IntegrationError::ProductNotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
            IntegrationError::InsufficientStock { .. } => (StatusCode::CONFLICT, err.to_string()),
            IntegrationError::Unavailable { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, err.to_string())
            }
        },

        WorkflowError::Store(store_err) => {
            tracing::error!(error = %store_err, "order store failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        ApiError::Workflow(err)
    }
}
