use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::UserRecord;

/// Persistence for upload records. Records are append-only: there is no
/// update or delete.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new record; the store assigns `id` and `created_at`.
    async fn create_user(&self, username: &str, image: &str) -> Result<UserRecord, sqlx::Error>;

    /// All records, newest first.
    async fn list_users(&self) -> Result<Vec<UserRecord>, sqlx::Error>;

    async fn ping(&self) -> Result<(), sqlx::Error>;
}

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create_user(&self, username: &str, image: &str) -> Result<UserRecord, sqlx::Error> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO user_info (id, username, image)
            VALUES ($1, $2, $3)
            RETURNING id, username, image, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(image)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, sqlx::Error> {
        let users = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, username, image, created_at
            FROM user_info
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        super::health_check(&self.pool).await
    }
}
