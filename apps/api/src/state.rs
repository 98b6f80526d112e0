//! # Router State
//!
//! The `Database` from `geoprice-db` wraps a `SqlitePool`, which is
//! thread-safe and cheap to clone, so handlers share it without locking.

use geoprice_db::Database;

/// State handed to every route handler.
#[derive(Debug, Clone)]
pub struct AppState {
    db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db }
    }

    /// Returns a reference to the inner Database.
    pub fn db(&self) -> &Database {
        &self.db
    }
}
