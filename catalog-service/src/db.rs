//! Catalog database operations
//!
//! Handles all database interactions for hotels and rooms. Every operation
//! that touches a room together with its hotel's counters runs inside a
//! single transaction, and the reservation/release mutations are conditional
//! updates keyed on the current availability flag so that concurrent
//! requests cannot both claim the same room.

use crate::error::AppError;
use crate::models::{Hotel, Room};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Database connection pool for catalog operations
#[derive(Clone)]
pub struct CatalogDb {
    pool: SqlitePool,
}

impl CatalogDb {
    /// Initialize database connection pool and run migrations
    ///
    /// # Arguments
    /// * `db_url` - SQLite URL or path, e.g. `sqlite:data/catalog.db`
    ///
    /// # Returns
    /// * `Ok(CatalogDb)` if successful
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

        let migration_sql = include_str!("../migrations/001_create_catalog.sql");

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

    /// Create a new hotel
    ///
    /// The hotel name is unique across the catalog; a duplicate fails with
    /// `HotelAlreadyExists`.
    pub async fn create_hotel(&self, hotel: &Hotel) -> Result<(), AppError> {
        // Advisory fast path; the UNIQUE constraint is the real guard.
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM hotels WHERE name = ?")
                .bind(&hotel.name)
                .fetch_one(&self.pool)
                .await?;
        if count > 0 {
            return Err(AppError::HotelAlreadyExists(hotel.name.clone()));
        }

        sqlx::query(
            "INSERT INTO hotels (id, name, description, address, city, stars, amenities, images, \
             owner_id, room_count, available_room_count, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&hotel.id)
        .bind(&hotel.name)
        .bind(&hotel.description)
        .bind(&hotel.address)
        .bind(&hotel.city)
        .bind(hotel.stars)
        .bind(&hotel.amenities)
        .bind(&hotel.images)
        .bind(&hotel.owner_id)
        .bind(hotel.room_count)
        .bind(hotel.available_room_count)
        .bind(hotel.created_at)
        .bind(hotel.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::HotelAlreadyExists(hotel.name.clone())
            }
            _ => AppError::Database(e),
        })?;

        debug!("Created hotel: {}", hotel.id);
        Ok(())
    }

    /// Get all hotels, most recently created first
    pub async fn list_hotels(&self) -> Result<Vec<Hotel>, AppError> {
        let hotels = sqlx::query_as::<_, Hotel>(
            "SELECT * FROM hotels ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(hotels)
    }

    /// Get a hotel by ID
    pub async fn get_hotel(&self, id: &str) -> Result<Option<Hotel>, AppError> {
        let hotel = sqlx::query_as::<_, Hotel>("SELECT * FROM hotels WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(hotel)
    }

    /// Delete a hotel
    ///
    /// Rooms and bookings referencing the hotel are deliberately left alone;
    /// cascading deletes are out of scope.
    pub async fn delete_hotel(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM hotels WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::HotelNotFound(id.to_string()));
        }

        debug!("Deleted hotel: {}", id);
        Ok(())
    }

    /// Create a room and bump the parent hotel's counters
    ///
    /// The room insert and the counter increments are one transaction: either
    /// both land or neither does. A room whose (name, description) pair
    /// already exists within the hotel is rejected as a conflict.
    pub async fn create_room(&self, room: &Room) -> Result<(), AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM rooms WHERE hotel_id = ? AND name = ? AND description = ?",
        )
        .bind(&room.hotel_id)
        .bind(&room.name)
        .bind(&room.description)
        .fetch_one(&self.pool)
        .await?;
        if count > 0 {
            return Err(AppError::RoomAlreadyExists(room.name.clone()));
        }

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE hotels SET room_count = room_count + 1, \
             available_room_count = available_room_count + 1, updated_at = ? \
             WHERE id = ?",
        )
        .bind(Utc::now())
        .bind(&room.hotel_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::HotelNotFound(room.hotel_id.clone()));
        }

        sqlx::query(
            "INSERT INTO rooms (id, hotel_id, name, description, price, capacity, amenities, \
             images, is_available, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&room.id)
        .bind(&room.hotel_id)
        .bind(&room.name)
        .bind(&room.description)
        .bind(room.price)
        .bind(room.capacity)
        .bind(&room.amenities)
        .bind(&room.images)
        .bind(room.is_available)
        .bind(room.created_at)
        .bind(room.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!("Created room {} in hotel {}", room.id, room.hotel_id);
        Ok(())
    }

    /// Get all rooms for a hotel
    pub async fn list_rooms(&self, hotel_id: &str) -> Result<Vec<Room>, AppError> {
        if self.get_hotel(hotel_id).await?.is_none() {
            return Err(AppError::HotelNotFound(hotel_id.to_string()));
        }

        let rooms = sqlx::query_as::<_, Room>(
            "SELECT * FROM rooms WHERE hotel_id = ? ORDER BY created_at ASC",
        )
        .bind(hotel_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rooms)
    }

    /// Get a room by ID
    pub async fn get_room(&self, id: &str) -> Result<Option<Room>, AppError> {
        let room = sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(room)
    }

    /// Delete a room and adjust the parent hotel's counters
    ///
    /// `room_count` always decrements; `available_room_count` only when the
    /// deleted room was still available, so a reserved room does not drive
    /// the counter below the real availability.
    pub async fn delete_room(&self, id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        // The DELETE is the first statement in the transaction so the write
        // lock is taken up front; RETURNING hands back what the counter
        // update needs to know.
        let deleted: Option<(String, bool)> = sqlx::query_as(
            "DELETE FROM rooms WHERE id = ? RETURNING hotel_id, is_available",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let (hotel_id, was_available) =
            deleted.ok_or_else(|| AppError::RoomNotFound(id.to_string()))?;

        let counter_update = if was_available {
            "UPDATE hotels SET room_count = room_count - 1, \
             available_room_count = available_room_count - 1, updated_at = ? WHERE id = ?"
        } else {
            "UPDATE hotels SET room_count = room_count - 1, updated_at = ? WHERE id = ?"
        };
        sqlx::query(counter_update)
            .bind(Utc::now())
            .bind(&hotel_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!("Deleted room {} from hotel {}", id, hotel_id);
        Ok(())
    }

    /// Reserve a room: atomically flip its availability flag off
    ///
    /// The flag flip is a conditional update (`... AND is_available = 1`);
    /// the matched-row count decides between success and `RoomUnavailable`,
    /// which closes the lost-update race between two concurrent reservations.
    pub async fn reserve_room(&self, id: &str) -> Result<Room, AppError> {
        let mut tx = self.pool.begin().await?;

        // Write-first: the conditional update opens the transaction so two
        // concurrent attempts serialize on the write lock instead of
        // deadlocking out of a shared read lock. RETURNING hands back the
        // updated row inside the transaction; a re-fetch after commit could
        // race a concurrent delete.
        let now = Utc::now();
        let updated: Option<Room> = sqlx::query_as(
            "UPDATE rooms SET is_available = 0, updated_at = ? \
             WHERE id = ? AND is_available = 1 RETURNING *",
        )
        .bind(now)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let room = match updated {
            Some(room) => room,
            None => {
                let exists: Option<(bool,)> =
                    sqlx::query_as("SELECT is_available FROM rooms WHERE id = ?")
                        .bind(id)
                        .fetch_optional(&mut *tx)
                        .await?;
                return Err(match exists {
                    None => AppError::RoomNotFound(id.to_string()),
                    Some(_) => AppError::RoomUnavailable(id.to_string()),
                });
            }
        };

        sqlx::query(
            "UPDATE hotels SET available_room_count = available_room_count - 1, \
             updated_at = ? WHERE id = ?",
        )
        .bind(now)
        .bind(&room.hotel_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!("Reserved room {}", id);
        Ok(room)
    }

    /// Release a room: the compensating mirror of [`reserve_room`]
    ///
    /// Only valid while the room is reserved; releasing an already-available
    /// room fails with `RoomAlreadyAvailable` instead of silently
    /// double-incrementing the hotel counter.
    ///
    /// [`reserve_room`]: CatalogDb::reserve_room
    pub async fn release_room(&self, id: &str) -> Result<Room, AppError> {
        let mut tx = self.pool.begin().await?;

        let now = Utc::now();
        let updated: Option<Room> = sqlx::query_as(
            "UPDATE rooms SET is_available = 1, updated_at = ? \
             WHERE id = ? AND is_available = 0 RETURNING *",
        )
        .bind(now)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let room = match updated {
            Some(room) => room,
            None => {
                let exists: Option<(bool,)> =
                    sqlx::query_as("SELECT is_available FROM rooms WHERE id = ?")
                        .bind(id)
                        .fetch_optional(&mut *tx)
                        .await?;
                return Err(match exists {
                    None => AppError::RoomNotFound(id.to_string()),
                    Some(_) => AppError::RoomAlreadyAvailable(id.to_string()),
                });
            }
        };

        sqlx::query(
            "UPDATE hotels SET available_room_count = available_room_count + 1, \
             updated_at = ? WHERE id = ?",
        )
        .bind(now)
        .bind(&room.hotel_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!("Released room {}", id);
        Ok(room)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_statements_and_strips_comments() {
        let sql = "-- header\nCREATE TABLE a (x INTEGER); -- trailing\nCREATE INDEX i ON a(x);\n";
        let statements = split_statements(sql);
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0], "CREATE TABLE a (x INTEGER)");
        assert_eq!(statements[1], "CREATE INDEX i ON a(x)");
    }
}
