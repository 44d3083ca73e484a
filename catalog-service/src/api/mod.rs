//! API module
//!
//! Contains HTTP request handlers for the catalog endpoints

pub mod hotels;
pub mod rooms;
