//! Catalog service client
//!
//! Direct HTTP client for the catalog's reserve/release endpoints. Built
//! once at startup around a shared `reqwest::Client` (connection pooling)
//! with a bounded per-request timeout; no catalog call can stall a booking
//! request indefinitely.

use std::time::Duration;
use thiserror::Error;

/// Failures of a catalog call, split so the booking workflow can tell a
/// room-level conflict from a transport-level fault
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog has no room with this id
    #[error("room {0} not found in catalog")]
    RoomNotFound(String),

    /// The room is already reserved
    #[error("room {0} is not available")]
    RoomUnavailable(String),

    /// Release refused because the room is not currently reserved
    #[error("room {0} is already available")]
    RoomAlreadyAvailable(String),

    /// The request never completed (connect failure, timeout)
    #[error("catalog request failed: {0}")]
    Transport(String),

    /// The catalog answered with a status this client does not expect
    #[error("catalog returned unexpected status {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code returned by the catalog
        status: u16,
        /// Response body, for the log trail
        body: String,
    },
}

/// Client for the catalog service peer
#[derive(Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    /// Build a client for the given catalog base URL
    ///
    /// # Arguments
    /// * `base_url` - e.g. `http://localhost:8080`
    /// * `timeout` - applied to every request
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, anyhow::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Reserve a room: `PATCH /api/v1/room/{roomId}`
    ///
    /// Idempotent in the failure direction: re-invoking for an
    /// already-reserved room returns `RoomUnavailable`, never a second
    /// reservation.
    pub async fn reserve_room(&self, room_id: &str) -> Result<(), CatalogError> {
        let url = format!("{}/api/v1/room/{}", self.base_url, room_id);
        tracing::debug!(url = %url, "Reserving room in catalog");

        let response = self
            .client
            .patch(&url)
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        match response.status() {
            reqwest::StatusCode::OK => {
                // Drain the body so the pooled connection can be reused;
                // the request timeout covers this read too.
                response
                    .text()
                    .await
                    .map_err(|e| CatalogError::Transport(e.to_string()))?;
                Ok(())
            }
            reqwest::StatusCode::NOT_FOUND => Err(CatalogError::RoomNotFound(room_id.to_string())),
            reqwest::StatusCode::CONFLICT => {
                Err(CatalogError::RoomUnavailable(room_id.to_string()))
            }
            status => Err(CatalogError::UnexpectedStatus {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }

    /// Release a room: `PATCH /api/v1/room/{roomId}/release`
    ///
    /// The compensating mirror of [`reserve_room`], used when the booking
    /// write fails after the reservation or when a booking is cancelled.
    ///
    /// [`reserve_room`]: CatalogClient::reserve_room
    pub async fn release_room(&self, room_id: &str) -> Result<(), CatalogError> {
        let url = format!("{}/api/v1/room/{}/release", self.base_url, room_id);
        tracing::debug!(url = %url, "Releasing room in catalog");

        let response = self
            .client
            .patch(&url)
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;

        match response.status() {
            reqwest::StatusCode::OK => {
                response
                    .text()
                    .await
                    .map_err(|e| CatalogError::Transport(e.to_string()))?;
                Ok(())
            }
            reqwest::StatusCode::NOT_FOUND => Err(CatalogError::RoomNotFound(room_id.to_string())),
            reqwest::StatusCode::CONFLICT => {
                Err(CatalogError::RoomAlreadyAvailable(room_id.to_string()))
            }
            status => Err(CatalogError::UnexpectedStatus {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn client_for(server: &Server) -> CatalogClient {
        CatalogClient::new(&server.url(), Duration::from_secs(2))
            .unwrap_or_else(|e| panic!("client build failed: {}", e))
    }

    #[tokio::test]
    async fn reserve_room_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PATCH", "/api/v1/room/room-1")
            .with_status(200)
            .with_body(r#"{"id": "room-1", "is_available": false}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.reserve_room("room-1").await;

        mock.assert_async().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn reserve_room_conflict_maps_to_unavailable() {
        let mut server = Server::new_async().await;
        server
            .mock("PATCH", "/api/v1/room/room-1")
            .with_status(409)
            .with_body(r#"{"error": "Room is not available: room-1"}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.reserve_room("room-1").await;

        assert!(matches!(result, Err(CatalogError::RoomUnavailable(_))));
    }

    #[tokio::test]
    async fn reserve_room_missing_maps_to_not_found() {
        let mut server = Server::new_async().await;
        server
            .mock("PATCH", "/api/v1/room/room-1")
            .with_status(404)
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.reserve_room("room-1").await;

        assert!(matches!(result, Err(CatalogError::RoomNotFound(_))));
    }

    #[tokio::test]
    async fn reserve_room_unreachable_is_transport_error() {
        // Nothing listens on this port; connection is refused immediately.
        let client = CatalogClient::new("http://127.0.0.1:9", Duration::from_millis(500))
            .unwrap_or_else(|e| panic!("client build failed: {}", e));
        let result = client.reserve_room("room-1").await;

        assert!(matches!(result, Err(CatalogError::Transport(_))));
    }

    #[tokio::test]
    async fn release_room_conflict_maps_to_already_available() {
        let mut server = Server::new_async().await;
        server
            .mock("PATCH", "/api/v1/room/room-1/release")
            .with_status(409)
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.release_room("room-1").await;

        assert!(matches!(result, Err(CatalogError::RoomAlreadyAvailable(_))));
    }

    #[tokio::test]
    async fn unexpected_status_is_reported_with_code() {
        let mut server = Server::new_async().await;
        server
            .mock("PATCH", "/api/v1/room/room-1")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.reserve_room("room-1").await;

        match result {
            Err(CatalogError::UnexpectedStatus { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected UnexpectedStatus, got {:?}", other),
        }
    }
}
