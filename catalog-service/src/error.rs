//! Error types and error handling for the catalog service
//!
//! This module defines custom error types that can be converted to HTTP responses.
//! All errors implement `IntoResponse` to provide consistent error formatting.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error types
///
/// Each variant implements automatic conversion to HTTP responses via
/// `IntoResponse`. Conflict-class errors (duplicates, availability guards)
/// map to 409 so clients can distinguish them from server faults.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request field failed validation (malformed id, bad range, empty field)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Hotel with the given ID was not found
    #[error("Hotel not found: {0}")]
    HotelNotFound(String),

    /// Room with the given ID was not found
    #[error("Room not found: {0}")]
    RoomNotFound(String),

    /// A hotel with the same name already exists
    #[error("Hotel already exists: {0}")]
    HotelAlreadyExists(String),

    /// The hotel already has a room with the same name and description
    #[error("Room already exists: {0}")]
    RoomAlreadyExists(String),

    /// Reservation refused because the room is already unavailable
    #[error("Room is not available: {0}")]
    RoomUnavailable(String),

    /// Release refused because the room is not currently reserved
    #[error("Room is already available: {0}")]
    RoomAlreadyAvailable(String),

    /// Store-level failure (connection, constraint, I/O)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal server error (catch-all for unexpected errors)
    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::HotelNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::RoomNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::HotelAlreadyExists(_) => (StatusCode::CONFLICT, self.to_string()),
            AppError::RoomAlreadyExists(_) => (StatusCode::CONFLICT, self.to_string()),
            AppError::RoomUnavailable(_) => (StatusCode::CONFLICT, self.to_string()),
            AppError::RoomAlreadyAvailable(_) => (StatusCode::CONFLICT, self.to_string()),
            // Store and internal failures are logged in full but returned
            // as a generic message.
            ref e @ (AppError::Database(_) | AppError::Internal(_)) => {
                tracing::error!("Internal error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
