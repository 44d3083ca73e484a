//! Booking database operations
//!
//! Handles all database interactions for booking records. Lifecycle
//! transitions are conditional updates (`... AND status = 'pending'`) so a
//! terminal booking can never be moved again, no matter how requests
//! interleave.

use crate::error::AppError;
use crate::models::{Booking, BookingStatus};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Database connection pool for booking operations
#[derive(Clone)]
pub struct BookingDb {
    pool: SqlitePool,
}

impl BookingDb {
    /// Initialize database connection pool and run migrations
    ///
    /// # Arguments
    /// * `db_url` - SQLite URL or path, e.g. `sqlite:data/booking.db`
    ///
    /// # Returns
    /// * `Ok(BookingDb)` if successful
    /// * `Err(AppError)` if connection or migration failed
    pub async fn new(db_url: &str) -> Result<Self, AppError> {
        let connection_string = if db_url.starts_with("sqlite:") {
            db_url.to_string()
        } else {
            format!("sqlite:{}", db_url)
        };

        // Ensure parent directory exists for file-backed databases
        if !connection_string.contains(":memory:") {
            let path = connection_string.trim_start_matches("sqlite:").to_string();
            if let Some(parent) = PathBuf::from(&path).parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::Internal(anyhow::anyhow!("Failed to create db directory: {}", e))
                })?;
            }
        }

        let options = SqliteConnectOptions::from_str(&connection_string)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid database path: {}", e)))?
            .create_if_missing(true)
            .foreign_keys(true)
            // WAL keeps concurrent writers waiting on one write lock
            // instead of deadlocking on a shared-to-reserved upgrade.
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        // A pool of in-memory connections would open one database per
        // connection, so :memory: is capped at a single connection.
        let max_connections = if connection_string.contains(":memory:") {
            1
        } else {
            5
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Failed to connect to database: {}", e))
            })?;

        info!("Connected to SQLite database at: {}", db_url);

        let db = Self { pool };
        db.run_migrations().await?;

        Ok(db)
    }

    /// Run database migrations
    async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations...");

        let migration_sql = include_str!("../migrations/001_create_bookings.sql");

        for statement in split_statements(migration_sql) {
            sqlx::query(&statement).execute(&self.pool).await.map_err(|e| {
                AppError::Internal(anyhow::anyhow!(
                    "Migration failed: {} - Statement: {}",
                    e,
                    statement.chars().take(100).collect::<String>()
                ))
            })?;
        }

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Find an active (non-cancelled) booking for a (user, room) pair
    ///
    /// Advisory duplicate check; the partial unique index in the schema is
    /// the authoritative guard under concurrency.
    pub async fn find_active_booking(
        &self,
        user_id: &str,
        room_id: &str,
    ) -> Result<Option<Booking>, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings \
             WHERE user_id = ? AND room_id = ? AND status <> 'cancelled'",
        )
        .bind(user_id)
        .bind(room_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    /// Insert a new booking record
    ///
    /// A unique-index violation means another request won the check-then-act
    /// race for this (user, room) pair and surfaces as `DuplicateBooking`.
    pub async fn insert_booking(&self, booking: &Booking) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO bookings (id, user_id, hotel_id, room_id, check_in, check_out, \
             total_price, is_paid, status, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&booking.id)
        .bind(&booking.user_id)
        .bind(&booking.hotel_id)
        .bind(&booking.room_id)
        .bind(booking.check_in)
        .bind(booking.check_out)
        .bind(booking.total_price)
        .bind(booking.is_paid)
        .bind(booking.status)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::DuplicateBooking(
                format!("user {} already booked room {}", booking.user_id, booking.room_id),
            ),
            _ => AppError::Database(e),
        })?;

        debug!("Inserted booking: {}", booking.id);
        Ok(())
    }

    /// Get a booking by ID
    pub async fn get_booking(&self, id: &str) -> Result<Option<Booking>, AppError> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(booking)
    }

    /// Transition a pending booking to `confirmed` and mark it paid
    pub async fn confirm_booking(&self, id: &str) -> Result<Booking, AppError> {
        self.transition(id, BookingStatus::Confirmed, true).await
    }

    /// Transition a pending booking to `cancelled`
    pub async fn cancel_booking(&self, id: &str) -> Result<Booking, AppError> {
        self.transition(id, BookingStatus::Cancelled, false).await
    }

    /// Conditionally move a booking out of `pending`
    ///
    /// The matched-row count of the conditional update decides the outcome:
    /// zero rows means either the booking does not exist (`NotFound`) or it
    /// already reached a terminal state (`InvalidTransition`).
    async fn transition(
        &self,
        id: &str,
        to: BookingStatus,
        mark_paid: bool,
    ) -> Result<Booking, AppError> {
        let now = Utc::now();
        let result = sqlx::query(
            "UPDATE bookings SET status = ?, is_paid = ?, updated_at = ? \
             WHERE id = ? AND status = 'pending'",
        )
        .bind(to)
        .bind(mark_paid)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return match self.get_booking(id).await? {
                None => Err(AppError::BookingNotFound(id.to_string())),
                Some(existing) => Err(AppError::InvalidTransition(format!(
                    "booking {} is {:?} and cannot move to {:?}",
                    id, existing.status, to
                ))),
            };
        }

        let booking = self
            .get_booking(id)
            .await?
            .ok_or_else(|| AppError::BookingNotFound(id.to_string()))?;

        debug!("Booking {} transitioned to {:?}", id, to);
        Ok(booking)
    }

    /// Get the database pool (for advanced operations if needed)
    #[allow(dead_code)]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Split a migration script into individual statements
///
/// Strips `--` comments and splits on semicolons; SQLite executes one
/// statement per query.
fn split_statements(sql: &str) -> Vec<String> {
    let mut cleaned = String::new();
    for line in sql.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("--") {
            continue;
        }
        let without_comments = if let Some(comment_pos) = trimmed.find("--") {
            &trimmed[..comment_pos]
        } else {
            trimmed
        };
        cleaned.push_str(without_comments.trim());
        cleaned.push(' ');
    }

    cleaned
        .split(';')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
