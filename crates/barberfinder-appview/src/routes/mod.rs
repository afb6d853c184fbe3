pub mod auth;
pub mod health;
pub mod reviews;
pub mod shops;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// Build the API route table
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/api/health", get(health::health))
        // Auth
        .route("/api/auth/google", post(auth::google_sign_in))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        // Shops - specific routes before the place-id wildcard
        .route("/api/shops/nearby", get(shops::nearby))
        .route("/api/shops/search", get(shops::search))
        .route("/api/shops/photo", get(shops::photo))
        .route("/api/shops/{place_id}/details", get(shops::details))
        // Reviews - one path, the id is a place id for GET/POST and a
        // review id for DELETE
        .route(
            "/api/reviews/{id}",
            get(reviews::list)
                .post(reviews::create)
                .delete(reviews::remove),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::test_state;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_reports_running() {
        let app = router(test_state().await);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], true);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let app = router(test_state().await);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
