use std::sync::Arc;

use google_places_client::PlacesClient;
use sqlx::SqlitePool;

/// Shared application state passed to all route handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub places: Arc<PlacesClient>,
    /// Expected audience for Google ID tokens; `None` skips the audience check
    pub google_client_id: Option<String>,
}
