//! Booking workflow
//!
//! The one place where two independently-owned stores must agree: a booking
//! only exists once the catalog has reserved the room, and a reserved room
//! must never outlive a failed booking write. The creation path is a
//! two-step saga: reserve, then persist, with a compensating release when
//! the second step fails.

use crate::audit;
use crate::catalog::{CatalogClient, CatalogError};
use crate::db::BookingDb;
use crate::error::AppError;
use crate::models::{validate_id, Booking, BookingStatus};
use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

/// Validated input for booking creation
pub struct BookingRequest {
    /// User requesting the booking
    pub user_id: String,
    /// Hotel the room belongs to
    pub hotel_id: String,
    /// Room to reserve
    pub room_id: String,
    /// First night (inclusive)
    pub check_in: NaiveDate,
    /// Departure day (exclusive), strictly after check-in
    pub check_out: NaiveDate,
    /// Total price for the stay
    pub total_price: f64,
}

impl BookingRequest {
    /// Validate raw request fields into a workflow-ready request
    ///
    /// Runs before any store or network access; every failure here is
    /// client-correctable `InvalidInput`.
    pub fn parse(
        user_id: &str,
        hotel_id: &str,
        room_id: &str,
        check_in: &str,
        check_out: &str,
        total_price: f64,
    ) -> Result<Self, AppError> {
        validate_id(user_id, "user id")?;
        validate_id(hotel_id, "hotel id")?;
        validate_id(room_id, "room id")?;

        let (check_in, check_out) = parse_stay_dates(check_in, check_out)?;

        if total_price <= 0.0 {
            return Err(AppError::InvalidInput(format!(
                "total price must be positive, got {}",
                total_price
            )));
        }

        Ok(Self {
            user_id: user_id.to_string(),
            hotel_id: hotel_id.to_string(),
            room_id: room_id.to_string(),
            check_in,
            check_out,
            total_price,
        })
    }
}

/// Parse and order-check a check-in/check-out date pair
fn parse_stay_dates(check_in: &str, check_out: &str) -> Result<(NaiveDate, NaiveDate), AppError> {
    let check_in = NaiveDate::parse_from_str(check_in, "%Y-%m-%d")
        .map_err(|_| AppError::InvalidInput(format!("invalid check-in date: {}", check_in)))?;
    let check_out = NaiveDate::parse_from_str(check_out, "%Y-%m-%d")
        .map_err(|_| AppError::InvalidInput(format!("invalid check-out date: {}", check_out)))?;

    if check_out <= check_in {
        return Err(AppError::InvalidInput(format!(
            "check-out ({}) must be after check-in ({})",
            check_out, check_in
        )));
    }

    Ok((check_in, check_out))
}

/// Booking workflow service
#[derive(Clone)]
pub struct BookingService {
    db: BookingDb,
    catalog: CatalogClient,
}

impl BookingService {
    /// Create the service from its two collaborators
    pub fn new(db: BookingDb, catalog: CatalogClient) -> Self {
        Self { db, catalog }
    }

    /// Create a booking
    ///
    /// 1. Advisory duplicate check for an active (user, room) booking.
    /// 2. Reserve the room at the catalog; nothing is written unless this
    ///    succeeds.
    /// 3. Persist the booking as `pending`/unpaid. If the write fails the
    ///    reservation is compensated with a release call, and the caller
    ///    gets the failure either way.
    pub async fn create_booking(&self, request: BookingRequest) -> Result<Booking, AppError> {
        if let Some(existing) = self
            .db
            .find_active_booking(&request.user_id, &request.room_id)
            .await?
        {
            return Err(AppError::DuplicateBooking(format!(
                "user {} already has booking {} for room {}",
                request.user_id, existing.id, request.room_id
            )));
        }

        self.catalog
            .reserve_room(&request.room_id)
            .await
            .map_err(map_reserve_error)?;

        let now = Utc::now();
        let booking = Booking {
            id: Booking::generate_id(),
            user_id: request.user_id,
            hotel_id: request.hotel_id,
            room_id: request.room_id,
            check_in: request.check_in,
            check_out: request.check_out,
            total_price: request.total_price,
            is_paid: false,
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        if let Err(e) = self.db.insert_booking(&booking).await {
            // Reserved but unbooked: undo the reservation before reporting.
            self.compensate_reservation(&booking.room_id, &booking.id).await;
            return Err(match e {
                AppError::DuplicateBooking(detail) => AppError::DuplicateBooking(detail),
                other => AppError::BookingPersistFailed(other.to_string()),
            });
        }

        info!(
            booking_id = %booking.id,
            room_id = %booking.room_id,
            "Booking created"
        );
        Ok(booking)
    }

    /// Confirm a pending booking: mark it paid and `confirmed`
    ///
    /// Does not call the catalog; the room was already reserved at creation.
    pub async fn confirm_booking(&self, booking_id: &str) -> Result<Booking, AppError> {
        validate_id(booking_id, "booking id")?;
        let booking = self.db.confirm_booking(booking_id).await?;

        info!(booking_id = %booking.id, "Booking confirmed");
        Ok(booking)
    }

    /// Cancel a pending booking and release its room
    ///
    /// The cancellation is recorded first; a failed release afterwards
    /// leaves a counter drift at the catalog that is reported as a
    /// reconciliation record rather than rolling back the user's intent.
    pub async fn cancel_booking(&self, booking_id: &str) -> Result<Booking, AppError> {
        validate_id(booking_id, "booking id")?;
        let booking = self.db.cancel_booking(booking_id).await?;

        match self.catalog.release_room(&booking.room_id).await {
            Ok(()) => info!(
                booking_id = %booking.id,
                room_id = %booking.room_id,
                "Booking cancelled, room released"
            ),
            Err(CatalogError::RoomAlreadyAvailable(_)) => warn!(
                booking_id = %booking.id,
                room_id = %booking.room_id,
                "Room was already available when cancelling"
            ),
            Err(e) => audit::reconciliation(
                "cancel_release",
                &format!(
                    "booking {} cancelled but room {} was not released: {}",
                    booking.id, booking.room_id, e
                ),
            ),
        }

        Ok(booking)
    }

    /// Fetch a booking by id
    pub async fn get_booking(&self, booking_id: &str) -> Result<Booking, AppError> {
        validate_id(booking_id, "booking id")?;
        self.db
            .get_booking(booking_id)
            .await?
            .ok_or_else(|| AppError::BookingNotFound(booking_id.to_string()))
    }

    /// Undo a reservation whose booking never materialized
    ///
    /// Best effort: a release failure here is the fatal inconsistency case
    /// (a room locked by nothing) and is written to the audit trail for
    /// manual reconciliation instead of being dropped.
    async fn compensate_reservation(&self, room_id: &str, booking_id: &str) {
        match self.catalog.release_room(room_id).await {
            Ok(()) => warn!(
                room_id = %room_id,
                booking_id = %booking_id,
                "Booking write failed; reservation compensated"
            ),
            Err(CatalogError::RoomAlreadyAvailable(_)) => warn!(
                room_id = %room_id,
                booking_id = %booking_id,
                "Booking write failed; room was already available"
            ),
            Err(e) => audit::reconciliation(
                "compensate_reservation",
                &format!(
                    "room {} reserved for failed booking {} and release failed: {}",
                    room_id, booking_id, e
                ),
            ),
        }
    }
}

/// Map a failed reserve call onto the booking error model
///
/// Room-level conflicts keep their identity; transport faults and surprise
/// statuses all mean the reservation did not happen.
fn map_reserve_error(e: CatalogError) -> AppError {
    match e {
        CatalogError::RoomNotFound(id) => AppError::RoomNotFound(id),
        CatalogError::RoomUnavailable(id) => AppError::RoomUnavailable(id),
        other => AppError::ReservationFailed(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER: &str = "7b6f3f00-1111-4222-8333-944445555666";
    const HOTEL: &str = "7b6f3f00-aaaa-4bbb-8ccc-9ddddeeeefff";
    const ROOM: &str = "7b6f3f00-9999-4888-8777-966665555444";

    #[test]
    fn parse_accepts_valid_request() {
        let request =
            BookingRequest::parse(USER, HOTEL, ROOM, "2026-09-01", "2026-09-05", 400.0)
                .unwrap_or_else(|e| panic!("expected valid request: {}", e));
        assert_eq!(request.check_in.to_string(), "2026-09-01");
        assert_eq!(request.check_out.to_string(), "2026-09-05");
    }

    #[test]
    fn parse_rejects_checkout_not_after_checkin() {
        let same = BookingRequest::parse(USER, HOTEL, ROOM, "2026-09-01", "2026-09-01", 400.0);
        assert!(matches!(same, Err(AppError::InvalidInput(_))));

        let before = BookingRequest::parse(USER, HOTEL, ROOM, "2026-09-05", "2026-09-01", 400.0);
        assert!(matches!(before, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn parse_rejects_malformed_dates() {
        let bad = BookingRequest::parse(USER, HOTEL, ROOM, "01-09-2026", "2026-09-05", 400.0);
        assert!(matches!(bad, Err(AppError::InvalidInput(_))));

        let not_a_date = BookingRequest::parse(USER, HOTEL, ROOM, "2026-02-30", "2026-03-02", 400.0);
        assert!(matches!(not_a_date, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn parse_rejects_bad_ids_and_price() {
        let bad_id = BookingRequest::parse("nope", HOTEL, ROOM, "2026-09-01", "2026-09-05", 400.0);
        assert!(matches!(bad_id, Err(AppError::InvalidInput(_))));

        let bad_price = BookingRequest::parse(USER, HOTEL, ROOM, "2026-09-01", "2026-09-05", 0.0);
        assert!(matches!(bad_price, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn reserve_errors_keep_conflict_identity() {
        let unavailable = map_reserve_error(CatalogError::RoomUnavailable(ROOM.to_string()));
        assert!(matches!(unavailable, AppError::RoomUnavailable(_)));

        let timeout = map_reserve_error(CatalogError::Transport("timed out".to_string()));
        assert!(matches!(timeout, AppError::ReservationFailed(_)));

        let surprise = map_reserve_error(CatalogError::UnexpectedStatus {
            status: 503,
            body: String::new(),
        });
        assert!(matches!(surprise, AppError::ReservationFailed(_)));
    }
}
