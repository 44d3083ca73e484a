//! Room API handlers
//!
//! Contains HTTP request handlers for room CRUD operations plus the
//! reserve/release endpoints used by the booking service.

use crate::audit;
use crate::error::AppError;
use crate::models::{validate_id, Room};
use crate::state::AppState;
use axum::{
    extract::{ConnectInfo, Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::types::Json as SqlJson;
use std::net::SocketAddr;

/// Create room request
#[derive(Deserialize)]
pub struct CreateRoomRequest {
    /// Hotel this room belongs to
    pub hotel_id: String,
    /// Room name, e.g. "Deluxe Suite"
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Nightly price, strictly positive
    pub price: f64,
    /// Number of people the room sleeps, strictly positive
    pub capacity: i64,
    /// Amenity names
    #[serde(default)]
    pub amenities: Vec<String>,
    /// Opaque image/asset references
    #[serde(default)]
    pub images: Vec<String>,
}

impl CreateRoomRequest {
    /// Validate field shapes before any store access
    fn validate(&self) -> Result<(), AppError> {
        validate_id(&self.hotel_id, "hotel id")?;
        if self.name.trim().is_empty() {
            return Err(AppError::InvalidInput("room name cannot be empty".to_string()));
        }
        if self.price <= 0.0 {
            return Err(AppError::InvalidInput(format!(
                "price must be positive, got {}",
                self.price
            )));
        }
        if self.capacity <= 0 {
            return Err(AppError::InvalidInput(format!(
                "capacity must be positive, got {}",
                self.capacity
            )));
        }
        Ok(())
    }
}

/// Rooms list response
#[derive(Serialize)]
pub struct RoomsListResponse {
    /// Rooms belonging to the requested hotel
    pub rooms: Vec<Room>,
    /// Total number of rooms
    pub count: usize,
}

/// POST /api/v1/room/ - Add a room to a hotel
pub async fn create_room(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(req): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<Room>), AppError> {
    req.validate()?;

    let now = Utc::now();
    let room = Room {
        id: Room::generate_id(),
        hotel_id: req.hotel_id,
        name: req.name,
        description: req.description,
        price: req.price,
        capacity: req.capacity,
        amenities: SqlJson(req.amenities),
        images: SqlJson(req.images),
        is_available: true,
        created_at: now,
        updated_at: now,
    };

    state.db.create_room(&room).await?;

    audit::record(
        "room_created",
        "success",
        "catalog",
        Some(addr),
        &format!("room {} in hotel {}", room.id, room.hotel_id),
    );

    Ok((StatusCode::CREATED, Json(room)))
}

/// GET /api/v1/room/:id - List rooms for a hotel
///
/// The path parameter is a hotel id here; the DELETE/PATCH routes on the
/// same path interpret it as a room id, mirroring the public API shape.
pub async fn list_rooms(
    State(state): State<AppState>,
    Path(hotel_id): Path<String>,
) -> Result<Json<RoomsListResponse>, AppError> {
    validate_id(&hotel_id, "hotel id")?;

    let rooms = state.db.list_rooms(&hotel_id).await?;

    Ok(Json(RoomsListResponse {
        count: rooms.len(),
        rooms,
    }))
}

/// DELETE /api/v1/room/:id - Delete a room
pub async fn delete_room(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Path(room_id): Path<String>,
) -> Result<StatusCode, AppError> {
    validate_id(&room_id, "room id")?;

    state.db.delete_room(&room_id).await?;

    audit::record(
        "room_deleted",
        "success",
        "catalog",
        Some(addr),
        &format!("room {}", room_id),
    );

    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/room/:id - Reserve a room (mark it unavailable)
///
/// Called by the booking service while creating a booking. Succeeds at most
/// once per availability cycle; a second attempt gets 409.
pub async fn reserve_room(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Path(room_id): Path<String>,
) -> Result<Json<Room>, AppError> {
    validate_id(&room_id, "room id")?;

    let room = match state.db.reserve_room(&room_id).await {
        Ok(room) => room,
        Err(e) => {
            audit::record(
                "room_reserved",
                "failure",
                "booking-service",
                Some(addr),
                &format!("room {}: {}", room_id, e),
            );
            return Err(e);
        }
    };

    audit::record(
        "room_reserved",
        "success",
        "booking-service",
        Some(addr),
        &format!("room {} in hotel {}", room.id, room.hotel_id),
    );

    Ok(Json(room))
}

/// PATCH /api/v1/room/:id/release - Release a reserved room
///
/// The compensating mirror of the reserve endpoint, used when a booking
/// fails after reservation or is cancelled.
pub async fn release_room(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Path(room_id): Path<String>,
) -> Result<Json<Room>, AppError> {
    validate_id(&room_id, "room id")?;

    let room = state.db.release_room(&room_id).await?;

    audit::record(
        "room_released",
        "success",
        "booking-service",
        Some(addr),
        &format!("room {} in hotel {}", room.id, room.hotel_id),
    );

    Ok(Json(room))
}
