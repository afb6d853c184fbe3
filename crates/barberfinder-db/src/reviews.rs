//! Review store: simple append/delete log keyed by place id.

use chrono::Utc;
use uuid::Uuid;

use crate::types::{NewReviewParams, ReviewRow};

/// Insert a review and return the stored row
pub async fn insert(
    executor: impl sqlx::SqliteExecutor<'_>,
    p: &NewReviewParams,
) -> Result<ReviewRow, sqlx::Error> {
    let row = ReviewRow {
        id: Uuid::new_v4().to_string(),
        place_id: p.place_id.clone(),
        shop_name: p.shop_name.clone(),
        author_name: p.author_name.clone(),
        rating: p.rating,
        comment: p.comment.clone(),
        avatar_color: p.avatar_color.clone(),
        user_id: p.user_id.clone(),
        user_avatar: p.user_avatar.clone(),
        created_at: Utc::now(),
    };

    sqlx::query(
        r#"
        INSERT INTO reviews (
            id, place_id, shop_name, author_name, rating, comment,
            avatar_color, user_id, user_avatar, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        "#,
    )
    .bind(&row.id)
    .bind(&row.place_id)
    .bind(&row.shop_name)
    .bind(&row.author_name)
    .bind(row.rating)
    .bind(&row.comment)
    .bind(&row.avatar_color)
    .bind(&row.user_id)
    .bind(&row.user_avatar)
    .bind(row.created_at)
    .execute(executor)
    .await?;

    Ok(row)
}

/// List reviews for a place, newest first
pub async fn list_for_place(
    executor: impl sqlx::SqliteExecutor<'_>,
    place_id: &str,
    limit: i64,
) -> Result<Vec<ReviewRow>, sqlx::Error> {
    sqlx::query_as::<_, ReviewRow>(
        "SELECT * FROM reviews WHERE place_id = ?1 ORDER BY created_at DESC LIMIT ?2",
    )
    .bind(place_id)
    .bind(limit)
    .fetch_all(executor)
    .await
}

/// Get a single review by id
pub async fn get(
    executor: impl sqlx::SqliteExecutor<'_>,
    id: &str,
) -> Result<Option<ReviewRow>, sqlx::Error> {
    sqlx::query_as::<_, ReviewRow>("SELECT * FROM reviews WHERE id = ?1")
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Delete a review by id
pub async fn delete(
    executor: impl sqlx::SqliteExecutor<'_>,
    id: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM reviews WHERE id = ?1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(())
}

/// Count reviews stored for a place (details enrichment)
pub async fn count_for_place(
    executor: impl sqlx::SqliteExecutor<'_>,
    place_id: &str,
) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM reviews WHERE place_id = ?1")
        .bind(place_id)
        .fetch_one(executor)
        .await?;
    Ok(row.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::test_pool;

    fn new_review(place_id: &str, author: &str) -> NewReviewParams {
        NewReviewParams {
            place_id: place_id.to_string(),
            shop_name: "Fade Factory".to_string(),
            author_name: author.to_string(),
            rating: 5,
            comment: "Great cut".to_string(),
            avatar_color: "#2dd4bf".to_string(),
            user_id: None,
            user_avatar: None,
        }
    }

    #[tokio::test]
    async fn insert_and_list_newest_first() {
        let pool = test_pool().await;

        let first = insert(&pool, &new_review("abc123", "Ana")).await.unwrap();
        // Force distinct timestamps so ordering is deterministic
        sqlx::query("UPDATE reviews SET created_at = ?1 WHERE id = ?2")
            .bind(Utc::now() - chrono::Duration::hours(1))
            .bind(&first.id)
            .execute(&pool)
            .await
            .unwrap();
        let second = insert(&pool, &new_review("abc123", "Ben")).await.unwrap();

        let rows = list_for_place(&pool, "abc123", 50).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, second.id);
        assert_eq!(rows[1].author_name, "Ana");
    }

    #[tokio::test]
    async fn list_respects_limit_and_place_scope() {
        let pool = test_pool().await;
        for i in 0..3 {
            insert(&pool, &new_review("abc123", &format!("author{i}")))
                .await
                .unwrap();
        }
        insert(&pool, &new_review("other", "Zed")).await.unwrap();

        let rows = list_for_place(&pool, "abc123", 2).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.place_id == "abc123"));
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let pool = test_pool().await;
        let row = insert(&pool, &new_review("abc123", "Ana")).await.unwrap();

        delete(&pool, &row.id).await.unwrap();
        assert!(get(&pool, &row.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn count_is_scoped_to_place() {
        let pool = test_pool().await;
        insert(&pool, &new_review("abc123", "Ana")).await.unwrap();
        insert(&pool, &new_review("abc123", "Ben")).await.unwrap();
        insert(&pool, &new_review("other", "Zed")).await.unwrap();

        assert_eq!(count_for_place(&pool, "abc123").await.unwrap(), 2);
        assert_eq!(count_for_place(&pool, "missing").await.unwrap(), 0);
    }
}
