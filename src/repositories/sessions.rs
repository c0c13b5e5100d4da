use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AppResult;
use crate::models::Session;

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, user_id: i32, token: &str) -> AppResult<Session>;
    async fn find_by_token(&self, token: &str) -> AppResult<Option<Session>>;
}

pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn create(&self, user_id: i32, token: &str) -> AppResult<Session> {
        let session = sqlx::query_as::<_, Session>(
            "INSERT INTO sessions (user_id, token)
             VALUES ($1, $2)
             RETURNING id, user_id, token, created_at, updated_at",
        )
        .bind(user_id)
        .bind(token)
        .fetch_one(&self.pool)
        .await?;
        Ok(session)
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(
            "SELECT id, user_id, token, created_at, updated_at FROM sessions WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(session)
    }
}
