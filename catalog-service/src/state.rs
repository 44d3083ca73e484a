//! Shared request-handler state
//!
//! Process-lifetime handles acquired once at startup and cloned into every
//! handler. Nothing here is mutable; the pool manages its own connections.

use crate::db::CatalogDb;

/// State injected into every catalog handler
#[derive(Clone)]
pub struct AppState {
    /// Catalog database handle
    pub db: CatalogDb,
}

impl AppState {
    /// Create state from an initialized database handle
    pub fn new(db: CatalogDb) -> Self {
        Self { db }
    }
}
