//! Catalog entities
//!
//! Persistent types for hotels and rooms. Both are stored in SQLite with
//! JSON-encoded string arrays for amenities and image references.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

/// A hotel in the catalog
///
/// Carries two denormalized counters: `room_count` (all rooms belonging to
/// the hotel) and `available_room_count` (rooms whose availability flag is
/// still set). The store layer keeps both in step with room mutations.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Hotel {
    /// Unique identifier (UUID string)
    pub id: String,
    /// Hotel name, unique across the catalog
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Street address
    pub address: String,
    /// City the hotel is located in
    pub city: String,
    /// Star rating (1-5)
    pub stars: i64,
    /// Amenity names, e.g. ["Gym", "Pool"]
    pub amenities: Json<Vec<String>>,
    /// Opaque image/asset references
    pub images: Json<Vec<String>>,
    /// Reference to the user who owns this hotel
    pub owner_id: String,
    /// Total number of rooms under this hotel
    pub room_count: i64,
    /// Number of rooms currently available
    pub available_room_count: i64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Hotel {
    /// Generate a new unique hotel id
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }
}

/// A room belonging to exactly one hotel
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Room {
    /// Unique identifier (UUID string)
    pub id: String,
    /// Hotel this room belongs to
    pub hotel_id: String,
    /// Room name, e.g. "Deluxe Suite"
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Nightly price, strictly positive
    pub price: f64,
    /// Number of people the room sleeps, strictly positive
    pub capacity: i64,
    /// Amenity names, e.g. ["WiFi", "TV", "AC"]
    pub amenities: Json<Vec<String>>,
    /// Opaque image/asset references
    pub images: Json<Vec<String>>,
    /// Availability flag; false while the room is reserved
    pub is_available: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Room {
    /// Generate a new unique room id
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }
}

/// Validate that a string is a well-formed opaque identifier
///
/// # Arguments
/// * `value` - The candidate id
/// * `what` - Field name used in the error message
pub fn validate_id(value: &str, what: &str) -> Result<(), crate::error::AppError> {
    Uuid::parse_str(value)
        .map(|_| ())
        .map_err(|_| crate::error::AppError::InvalidInput(format!("invalid {}: {}", what, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_valid() {
        assert!(validate_id(&Hotel::generate_id(), "hotel id").is_ok());
        assert!(validate_id(&Room::generate_id(), "room id").is_ok());
    }

    #[test]
    fn rejects_malformed_ids() {
        assert!(validate_id("not-a-uuid", "hotel id").is_err());
        assert!(validate_id("", "room id").is_err());
    }
}
