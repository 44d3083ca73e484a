//! Booking Service Library
//!
//! Owns booking entities and the cross-service reservation workflow.
//! This library exposes modules for testing and external use; the main
//! binary is in `src/main.rs`.

pub mod api;
pub mod audit;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
