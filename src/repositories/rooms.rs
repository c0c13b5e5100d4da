use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AppResult;
use crate::models::RoomCapacity;

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn find_capacity_by_id(&self, id: i32) -> AppResult<Option<RoomCapacity>>;
}

pub struct PgRoomRepository {
    pool: PgPool,
}

impl PgRoomRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomRepository for PgRoomRepository {
    async fn find_capacity_by_id(&self, id: i32) -> AppResult<Option<RoomCapacity>> {
        let room = sqlx::query_as::<_, RoomCapacity>("SELECT id, capacity FROM rooms WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(room)
    }
}
