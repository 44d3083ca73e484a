//! Booking API handlers
//!
//! Thin HTTP layer over [`BookingService`]; all workflow decisions live in
//! the service.
//!
//! [`BookingService`]: crate::services::bookings::BookingService

use crate::audit;
use crate::error::AppError;
use crate::models::Booking;
use crate::services::bookings::BookingRequest;
use crate::state::AppState;
use axum::{
    extract::{ConnectInfo, Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use std::net::SocketAddr;

/// Create booking request body
#[derive(Deserialize)]
pub struct CreateBookingRequest {
    /// User requesting the booking
    pub user_id: String,
    /// Hotel the room belongs to
    pub hotel_id: String,
    /// Room to reserve
    pub room_id: String,
    /// Check-in date, `YYYY-MM-DD`
    pub check_in: String,
    /// Check-out date, `YYYY-MM-DD`, strictly after check-in
    pub check_out: String,
    /// Total price for the stay
    pub total_price: f64,
}

/// POST /api/v1/booking/ - Create a booking
///
/// Runs the reservation workflow against the catalog service before the
/// booking record is written.
pub async fn create_booking(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let request = BookingRequest::parse(
        &req.user_id,
        &req.hotel_id,
        &req.room_id,
        &req.check_in,
        &req.check_out,
        req.total_price,
    )?;

    let actor = request.user_id.clone();
    let room_id = request.room_id.clone();

    let booking = match state.service.create_booking(request).await {
        Ok(booking) => booking,
        Err(e) => {
            audit::record(
                "booking_created",
                "failure",
                &actor,
                Some(addr),
                &format!("room {}: {}", room_id, e),
            );
            return Err(e);
        }
    };

    audit::record(
        "booking_created",
        "success",
        &actor,
        Some(addr),
        &format!("booking {} for room {}", booking.id, booking.room_id),
    );

    Ok((StatusCode::CREATED, Json(booking)))
}

/// GET /api/v1/booking/:bookingId - Fetch a booking
pub async fn get_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    let booking = state.service.get_booking(&booking_id).await?;
    Ok(Json(booking))
}

/// PATCH /api/v1/booking/:bookingId - Confirm a booking
///
/// Keyed by booking id; marks the booking paid and moves it to `confirmed`.
pub async fn confirm_booking(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Path(booking_id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    let booking = state.service.confirm_booking(&booking_id).await?;

    audit::record(
        "booking_confirmed",
        "success",
        &booking.user_id,
        Some(addr),
        &format!("booking {} for room {}", booking.id, booking.room_id),
    );

    Ok(Json(booking))
}

/// PATCH /api/v1/booking/:bookingId/cancel - Cancel a booking
///
/// Moves a pending booking to `cancelled` and releases the reserved room.
pub async fn cancel_booking(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Path(booking_id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    let booking = state.service.cancel_booking(&booking_id).await?;

    audit::record(
        "booking_cancelled",
        "success",
        &booking.user_id,
        Some(addr),
        &format!("booking {} for room {}", booking.id, booking.room_id),
    );

    Ok(Json(booking))
}
