//! Shared request-handler state
//!
//! Process-lifetime handles acquired once at startup and cloned into every
//! handler. Nothing here is mutable; the pool and HTTP client manage their
//! own connections.

use crate::services::bookings::BookingService;

/// State injected into every booking handler
#[derive(Clone)]
pub struct AppState {
    /// Booking workflow service
    pub service: BookingService,
}

impl AppState {
    /// Create state from an initialized booking service
    pub fn new(service: BookingService) -> Self {
        Self { service }
    }
}
