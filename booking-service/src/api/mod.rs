//! API module
//!
//! Contains HTTP request handlers for the booking endpoints

pub mod bookings;
