use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AppResult;
use crate::models::{Hotel, HotelWithRooms, Room};

#[async_trait]
pub trait HotelRepository: Send + Sync {
    async fn find_many(&self) -> AppResult<Vec<Hotel>>;
    async fn find_by_id_with_rooms(&self, id: i32) -> AppResult<Option<HotelWithRooms>>;
}

pub struct PgHotelRepository {
    pool: PgPool,
}

impl PgHotelRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HotelRepository for PgHotelRepository {
    async fn find_many(&self) -> AppResult<Vec<Hotel>> {
        let hotels = sqlx::query_as::<_, Hotel>(
            "SELECT id, name, image, created_at, updated_at FROM hotels ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(hotels)
    }

    async fn find_by_id_with_rooms(&self, id: i32) -> AppResult<Option<HotelWithRooms>> {
        let hotel = sqlx::query_as::<_, Hotel>(
            "SELECT id, name, image, created_at, updated_at FROM hotels WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(hotel) = hotel else {
            return Ok(None);
        };

        let rooms = sqlx::query_as::<_, Room>(
            "SELECT id, name, capacity, hotel_id, created_at, updated_at
             FROM rooms
             WHERE hotel_id = $1
             ORDER BY id",
        )
        .bind(hotel.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(HotelWithRooms { hotel, rooms }))
    }
}
