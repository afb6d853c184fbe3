//! User store for Google sign-in identities.

use chrono::Utc;
use uuid::Uuid;

use crate::types::UserRow;

/// Parameters for upserting a user after Google token verification
#[derive(Debug, Clone)]
pub struct UpsertUserParams {
    pub google_id: String,
    pub email: String,
    pub name: String,
    pub avatar: Option<String>,
}

/// Upsert a user keyed by Google id: creates on first sign-in, refreshes
/// email/name/avatar on return visits. Role is preserved across updates.
pub async fn upsert(
    executor: impl sqlx::SqliteExecutor<'_>,
    p: &UpsertUserParams,
) -> Result<UserRow, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (id, google_id, email, name, avatar, role, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, 'user', ?6)
        ON CONFLICT (google_id) DO UPDATE SET
            email = ?3,
            name = ?4,
            avatar = ?5
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&p.google_id)
    .bind(&p.email)
    .bind(&p.name)
    .bind(&p.avatar)
    .bind(Utc::now())
    .fetch_one(executor)
    .await
}

/// Get a user by id
pub async fn get(
    executor: impl sqlx::SqliteExecutor<'_>,
    id: &str,
) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = ?1")
        .bind(id)
        .fetch_optional(executor)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::test_pool;

    fn params(google_id: &str, name: &str) -> UpsertUserParams {
        UpsertUserParams {
            google_id: google_id.to_string(),
            email: format!("{name}@example.com"),
            name: name.to_string(),
            avatar: None,
        }
    }

    #[tokio::test]
    async fn upsert_keeps_id_and_role_on_return_visit() {
        let pool = test_pool().await;

        let created = upsert(&pool, &params("g-1", "Ana")).await.unwrap();
        sqlx::query("UPDATE users SET role = 'admin' WHERE id = ?1")
            .bind(&created.id)
            .execute(&pool)
            .await
            .unwrap();

        let returned = upsert(&pool, &params("g-1", "Ana Updated")).await.unwrap();
        assert_eq!(returned.id, created.id);
        assert_eq!(returned.name, "Ana Updated");
        assert_eq!(returned.role, "admin");
    }

    #[tokio::test]
    async fn distinct_google_ids_create_distinct_users() {
        let pool = test_pool().await;
        let a = upsert(&pool, &params("g-1", "Ana")).await.unwrap();
        let b = upsert(&pool, &params("g-2", "Ben")).await.unwrap();
        assert_ne!(a.id, b.id);
    }
}
