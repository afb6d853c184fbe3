//! Shared fixtures for router and search tests

use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;

use google_places_client::PlacesClient;

use crate::state::AppState;

/// Fresh in-memory state with an unreachable provider.
///
/// Port 1 on loopback refuses connections, so any code path that reaches
/// the provider fails fast and deterministically.
pub async fn test_state() -> AppState {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    barberfinder_db::migrate::migrate(&pool).await.unwrap();

    AppState {
        pool,
        places: Arc::new(PlacesClient::with_base_url("test-key", "http://127.0.0.1:1")),
        google_client_id: None,
    }
}
