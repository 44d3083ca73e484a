//! Error types and error handling for the booking service
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
/// Conflict-class failures (duplicate booking, room unavailable, bad
/// lifecycle transition) map to 409. A downstream catalog failure that is
/// neither of those maps to 502: the request was sound but the peer could
/// not be reached or answered unexpectedly.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request field failed validation (malformed id, bad date, bad price)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An active booking already exists for this (user, room) pair
    #[error("Booking already exists: {0}")]
    DuplicateBooking(String),

    /// Booking with the given ID was not found
    #[error("Booking not found: {0}")]
    BookingNotFound(String),

    /// The catalog has no such room
    #[error("Room not found: {0}")]
    RoomNotFound(String),

    /// The catalog refused the reservation: room already taken
    #[error("Room is not available: {0}")]
    RoomUnavailable(String),

    /// The reservation call failed for transport or peer reasons
    #[error("Reservation failed: {0}")]
    ReservationFailed(String),

    /// The booking write failed after the room was reserved; a compensating
    /// release was attempted
    #[error("Failed to persist booking: {0}")]
    BookingPersistFailed(String),

    /// The booking is not in a state that allows the requested transition
    #[error("Invalid booking transition: {0}")]
    InvalidTransition(String),

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
            AppError::DuplicateBooking(_) => (StatusCode::CONFLICT, self.to_string()),
            AppError::BookingNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::RoomNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::RoomUnavailable(_) => (StatusCode::CONFLICT, self.to_string()),
            AppError::InvalidTransition(_) => (StatusCode::CONFLICT, self.to_string()),
            AppError::ReservationFailed(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            ref e @ AppError::BookingPersistFailed(_) => {
                tracing::error!("Booking persistence failure: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
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
