use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::UserStore;
use crate::models::UserRecord;

/// Process-local record store for running the router without Postgres.
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    inner: Arc<RwLock<Vec<UserRecord>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create_user(&self, username: &str, image: &str) -> Result<UserRecord, sqlx::Error> {
        let user = UserRecord {
            id: Uuid::new_v4(),
            username: username.to_string(),
            image: Some(image.to_string()),
            created_at: Utc::now(),
        };

        let mut guard = self.inner.write().await;
        guard.push(user.clone());
        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, sqlx::Error> {
        let guard = self.inner.read().await;
        // Reverse first so equal timestamps still come out newest-insert first
        let mut users: Vec<UserRecord> = guard.iter().rev().cloned().collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(users)
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        Ok(())
    }
}
