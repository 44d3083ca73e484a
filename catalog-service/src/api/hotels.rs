//! Hotel API handlers
//!
//! Contains HTTP request handlers for hotel CRUD operations.

use crate::audit;
use crate::error::AppError;
use crate::models::{validate_id, Hotel};
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

/// Create hotel request
#[derive(Deserialize)]
pub struct CreateHotelRequest {
    /// Hotel name, unique across the catalog
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Street address
    pub address: String,
    /// City the hotel is located in
    pub city: String,
    /// Star rating (1-5)
    pub stars: i64,
    /// Amenity names
    #[serde(default)]
    pub amenities: Vec<String>,
    /// Opaque image/asset references (upload itself is handled elsewhere)
    #[serde(default)]
    pub images: Vec<String>,
    /// Reference to the user who owns this hotel
    pub owner_id: String,
}

impl CreateHotelRequest {
    /// Validate field shapes before any store access
    fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::InvalidInput("hotel name cannot be empty".to_string()));
        }
        if self.address.trim().is_empty() {
            return Err(AppError::InvalidInput("address cannot be empty".to_string()));
        }
        if self.city.trim().is_empty() {
            return Err(AppError::InvalidInput("city cannot be empty".to_string()));
        }
        if !(1..=5).contains(&self.stars) {
            return Err(AppError::InvalidInput(format!(
                "stars must be between 1 and 5, got {}",
                self.stars
            )));
        }
        validate_id(&self.owner_id, "owner id")?;
        Ok(())
    }
}

/// Hotels list response
#[derive(Serialize)]
pub struct HotelsListResponse {
    /// List of all hotels
    pub hotels: Vec<Hotel>,
    /// Total number of hotels
    pub count: usize,
}

/// POST /api/v1/hotel/ - Add a hotel
pub async fn create_hotel(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(req): Json<CreateHotelRequest>,
) -> Result<(StatusCode, Json<Hotel>), AppError> {
    req.validate()?;

    let now = Utc::now();
    let hotel = Hotel {
        id: Hotel::generate_id(),
        name: req.name,
        description: req.description,
        address: req.address,
        city: req.city,
        stars: req.stars,
        amenities: SqlJson(req.amenities),
        images: SqlJson(req.images),
        owner_id: req.owner_id,
        room_count: 0,
        available_room_count: 0,
        created_at: now,
        updated_at: now,
    };

    state.db.create_hotel(&hotel).await?;

    audit::record(
        "hotel_created",
        "success",
        &hotel.owner_id,
        Some(addr),
        &format!("hotel {} ({})", hotel.id, hotel.name),
    );

    Ok((StatusCode::CREATED, Json(hotel)))
}

/// GET /api/v1/hotel/ - List all hotels
pub async fn list_hotels(
    State(state): State<AppState>,
) -> Result<Json<HotelsListResponse>, AppError> {
    let hotels = state.db.list_hotels().await?;

    Ok(Json(HotelsListResponse {
        count: hotels.len(),
        hotels,
    }))
}

/// GET /api/v1/hotel/:hotelId - Get a specific hotel
pub async fn get_hotel(
    State(state): State<AppState>,
    Path(hotel_id): Path<String>,
) -> Result<Json<Hotel>, AppError> {
    validate_id(&hotel_id, "hotel id")?;

    let hotel = state
        .db
        .get_hotel(&hotel_id)
        .await?
        .ok_or(AppError::HotelNotFound(hotel_id))?;

    Ok(Json(hotel))
}

/// DELETE /api/v1/hotel/:hotelId - Delete a hotel
pub async fn delete_hotel(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Path(hotel_id): Path<String>,
) -> Result<StatusCode, AppError> {
    validate_id(&hotel_id, "hotel id")?;

    state.db.delete_hotel(&hotel_id).await?;

    audit::record(
        "hotel_deleted",
        "success",
        "catalog",
        Some(addr),
        &format!("hotel {}", hotel_id),
    );

    Ok(StatusCode::NO_CONTENT)
}
