use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Errors that can occur during startup and request handling.
///
/// Nutrition fetch failures never appear here: they are absorbed by the
/// fetcher and turned into sentinel records.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Dataset file or socket I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Dataset row that could not be parsed
    #[error("Malformed dataset row at line {line}: {message}")]
    DatasetFormat { line: usize, message: String },

    /// Recipe lookup called with an empty ingredient list
    #[error("No ingredients provided. Please add at least one item.")]
    EmptyIngredients,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::EmptyIngredients => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
