use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AppResult;
use crate::models::Event;

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn find_first(&self) -> AppResult<Option<Event>>;
}

pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn find_first(&self) -> AppResult<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(
            "SELECT id, title, background_image_url, logo_image_url, starts_at, ends_at, created_at, updated_at
             FROM events
             ORDER BY id
             LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(event)
    }
}
