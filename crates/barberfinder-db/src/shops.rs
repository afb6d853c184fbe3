//! Geospatial cache store for place listings.
//!
//! Rows are snapshots of provider results keyed by place id. Readers only
//! ever see rows that are both fresh (cached_at within the caller's window)
//! and within the requested radius of the query center.

use chrono::Utc;
use tracing::debug;

use crate::geo;
use crate::types::{ShopRow, UpsertShopParams};

/// Upsert a cached shop, refreshing `cached_at`.
///
/// Keyed by place id: a write for an existing id replaces the prior row.
pub async fn upsert(
    executor: impl sqlx::SqliteExecutor<'_>,
    p: &UpsertShopParams,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO shops (
            place_id, name, address, rating, user_ratings_total,
            price_level, photo_reference, is_open, latitude, longitude, cached_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        ON CONFLICT (place_id) DO UPDATE SET
            name = ?2,
            address = ?3,
            rating = ?4,
            user_ratings_total = ?5,
            price_level = ?6,
            photo_reference = ?7,
            is_open = ?8,
            latitude = ?9,
            longitude = ?10,
            cached_at = ?11
        "#,
    )
    .bind(&p.place_id)
    .bind(&p.name)
    .bind(&p.address)
    .bind(p.rating)
    .bind(p.user_ratings_total)
    .bind(p.price_level)
    .bind(&p.photo_reference)
    .bind(p.is_open)
    .bind(p.latitude)
    .bind(p.longitude)
    .bind(Utc::now().timestamp())
    .execute(executor)
    .await?;
    Ok(())
}

/// Get a single cached shop by place id
pub async fn get(
    executor: impl sqlx::SqliteExecutor<'_>,
    place_id: &str,
) -> Result<Option<ShopRow>, sqlx::Error> {
    sqlx::query_as::<_, ShopRow>("SELECT * FROM shops WHERE place_id = ?1")
        .bind(place_id)
        .fetch_optional(executor)
        .await
}

/// Find cached shops within `radius_meters` of the center whose `cached_at`
/// is at or after `cached_since` (unix seconds), ordered nearest first and
/// capped at `limit`.
///
/// The SQL side filters by freshness and a bounding box derived from the
/// radius; the exact great-circle check runs here on the candidates.
pub async fn find_within_radius(
    executor: impl sqlx::SqliteExecutor<'_>,
    lat: f64,
    lng: f64,
    radius_meters: f64,
    cached_since: i64,
    limit: usize,
) -> Result<Vec<ShopRow>, sqlx::Error> {
    let (min_lat, max_lat, min_lng, max_lng) = geo::bounding_box(lat, lng, radius_meters);

    let candidates = sqlx::query_as::<_, ShopRow>(
        r#"
        SELECT * FROM shops
        WHERE cached_at >= ?1
          AND latitude BETWEEN ?2 AND ?3
          AND longitude BETWEEN ?4 AND ?5
        "#,
    )
    .bind(cached_since)
    .bind(min_lat)
    .bind(max_lat)
    .bind(min_lng)
    .bind(max_lng)
    .fetch_all(executor)
    .await?;

    let mut within: Vec<(f64, ShopRow)> = candidates
        .into_iter()
        .filter_map(|row| {
            let d = geo::haversine_meters(lat, lng, row.latitude, row.longitude);
            (d <= radius_meters).then_some((d, row))
        })
        .collect();
    within.sort_by(|a, b| a.0.total_cmp(&b.0));

    debug!(
        lat,
        lng,
        radius_meters,
        matched = within.len(),
        "radius query against shop cache"
    );

    Ok(within
        .into_iter()
        .take(limit)
        .map(|(_, row)| row)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::test_pool;

    fn params(place_id: &str, lat: f64, lng: f64) -> UpsertShopParams {
        UpsertShopParams {
            place_id: place_id.to_string(),
            name: format!("Shop {place_id}"),
            address: Some("1 Main St".to_string()),
            rating: Some(4.5),
            user_ratings_total: 10,
            price_level: Some(2),
            photo_reference: None,
            is_open: Some(true),
            latitude: lat,
            longitude: lng,
        }
    }

    async fn backdate(pool: &sqlx::SqlitePool, place_id: &str, seconds_ago: i64) {
        sqlx::query("UPDATE shops SET cached_at = ?1 WHERE place_id = ?2")
            .bind(Utc::now().timestamp() - seconds_ago)
            .bind(place_id)
            .execute(pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn upsert_replaces_existing_row() {
        let pool = test_pool().await;

        upsert(&pool, &params("abc123", 31.52, 74.36)).await.unwrap();

        let mut updated = params("abc123", 31.52, 74.36);
        updated.name = "Renamed".to_string();
        updated.rating = Some(3.0);
        upsert(&pool, &updated).await.unwrap();

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM shops")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count.0, 1);

        let row = get(&pool, "abc123").await.unwrap().unwrap();
        assert_eq!(row.name, "Renamed");
        assert_eq!(row.rating, Some(3.0));
    }

    #[tokio::test]
    async fn upsert_refreshes_cached_at() {
        let pool = test_pool().await;

        upsert(&pool, &params("abc123", 31.52, 74.36)).await.unwrap();
        backdate(&pool, "abc123", 13 * 3600).await;
        upsert(&pool, &params("abc123", 31.52, 74.36)).await.unwrap();

        let row = get(&pool, "abc123").await.unwrap().unwrap();
        assert!(Utc::now().timestamp() - row.cached_at < 60);
    }

    #[tokio::test]
    async fn fresh_nearby_row_is_returned() {
        let pool = test_pool().await;
        upsert(&pool, &params("abc123", 31.52, 74.36)).await.unwrap();
        // Cached an hour ago, well within a 12h window
        backdate(&pool, "abc123", 3600).await;

        let since = Utc::now().timestamp() - 12 * 3600;
        let rows = find_within_radius(&pool, 31.5204, 74.3587, 5000.0, since, 20)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].place_id, "abc123");
    }

    #[tokio::test]
    async fn stale_row_is_excluded() {
        let pool = test_pool().await;
        upsert(&pool, &params("abc123", 31.52, 74.36)).await.unwrap();
        backdate(&pool, "abc123", 13 * 3600).await;

        let since = Utc::now().timestamp() - 12 * 3600;
        let rows = find_within_radius(&pool, 31.5204, 74.3587, 5000.0, since, 20)
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn out_of_radius_row_is_excluded() {
        let pool = test_pool().await;
        // ~34km away from the query center
        upsert(&pool, &params("far", 31.83, 74.36)).await.unwrap();
        upsert(&pool, &params("near", 31.521, 74.361)).await.unwrap();

        let since = Utc::now().timestamp() - 12 * 3600;
        let rows = find_within_radius(&pool, 31.52, 74.36, 5000.0, since, 20)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].place_id, "near");
    }

    #[tokio::test]
    async fn every_returned_row_is_within_radius() {
        let pool = test_pool().await;
        for (i, offset) in [0.001, 0.01, 0.02, 0.05, 0.2].iter().enumerate() {
            upsert(&pool, &params(&format!("p{i}"), 31.52 + offset, 74.36))
                .await
                .unwrap();
        }

        let since = Utc::now().timestamp() - 12 * 3600;
        let radius = 5000.0;
        let rows = find_within_radius(&pool, 31.52, 74.36, radius, since, 20)
            .await
            .unwrap();
        assert!(!rows.is_empty());
        for row in &rows {
            let d = geo::haversine_meters(31.52, 74.36, row.latitude, row.longitude);
            assert!(d <= radius, "{} at {d}m exceeds radius", row.place_id);
        }
    }

    #[tokio::test]
    async fn results_are_capped_and_nearest_first() {
        let pool = test_pool().await;
        for i in 0..25 {
            let offset = i as f64 * 0.0005;
            upsert(&pool, &params(&format!("p{i:02}"), 31.52 + offset, 74.36))
                .await
                .unwrap();
        }

        let since = Utc::now().timestamp() - 12 * 3600;
        let rows = find_within_radius(&pool, 31.52, 74.36, 10_000.0, since, 20)
            .await
            .unwrap();
        assert_eq!(rows.len(), 20);
        assert_eq!(rows[0].place_id, "p00");

        let distances: Vec<f64> = rows
            .iter()
            .map(|r| geo::haversine_meters(31.52, 74.36, r.latitude, r.longitude))
            .collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn repeated_query_is_idempotent() {
        let pool = test_pool().await;
        for (i, lng) in [74.36, 74.361, 74.362].iter().enumerate() {
            upsert(&pool, &params(&format!("p{i}"), 31.52, *lng))
                .await
                .unwrap();
        }

        let since = Utc::now().timestamp() - 12 * 3600;
        let first = find_within_radius(&pool, 31.52, 74.36, 5000.0, since, 20)
            .await
            .unwrap();
        let second = find_within_radius(&pool, 31.52, 74.36, 5000.0, since, 20)
            .await
            .unwrap();

        let ids = |rows: &[ShopRow]| rows.iter().map(|r| r.place_id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&first), ids(&second));
        assert_eq!(first.len(), 3);
    }
}
