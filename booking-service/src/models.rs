//! Booking entities
//!
//! The booking record and its status lifecycle. Stay dates are calendar
//! dates (check-in inclusive, check-out exclusive); record timestamps are
//! UTC instants.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Booking status lifecycle
///
/// `Pending` is the only non-terminal state: it may move to `Confirmed`
/// (payment received) or `Cancelled` (which releases the reserved room).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Created, room reserved, payment outstanding
    Pending,
    /// Paid and locked in; terminal
    Confirmed,
    /// Withdrawn, room released; terminal
    Cancelled,
}

/// A booking of one room by one user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Booking {
    /// Unique identifier (UUID string)
    pub id: String,
    /// User who requested the booking
    pub user_id: String,
    /// Hotel the booked room belongs to
    pub hotel_id: String,
    /// The booked room
    pub room_id: String,
    /// First night of the stay (inclusive)
    pub check_in: NaiveDate,
    /// Day of departure (exclusive)
    pub check_out: NaiveDate,
    /// Total price for the stay, strictly positive
    pub total_price: f64,
    /// Whether payment has been received
    pub is_paid: bool,
    /// Current lifecycle status
    pub status: BookingStatus,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Generate a new unique booking id
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }
}

/// Validate that a string is a well-formed opaque identifier
pub fn validate_id(value: &str, what: &str) -> Result<(), crate::error::AppError> {
    Uuid::parse_str(value)
        .map(|_| ())
        .map_err(|_| crate::error::AppError::InvalidInput(format!("invalid {}: {}", what, value)))
}
