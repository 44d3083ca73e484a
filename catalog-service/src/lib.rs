//! Catalog Service Library
//!
//! Owns hotel and room entities and the room availability accounting.
//! This library exposes modules for testing and external use; the main
//! binary is in `src/main.rs`.

pub mod api;
pub mod audit;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod state;
