use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{FromRow, PgPool};

use crate::error::{AppError, AppResult};
use crate::models::{Booking, BookingWithRoom, Room};

pub const ALREADY_BOOKED: &str = "User already has a booking";

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Fails with `Forbidden(ALREADY_BOOKED)` when the user already holds a booking.
    async fn create(&self, user_id: i32, room_id: i32) -> AppResult<i32>;
    async fn find_by_id(&self, id: i32) -> AppResult<Option<Booking>>;
    async fn find_by_user_id(&self, user_id: i32) -> AppResult<Option<BookingWithRoom>>;
    async fn count_by_room_id(&self, room_id: i32) -> AppResult<i64>;
    async fn update_room(&self, id: i32, room_id: i32) -> AppResult<i32>;
}

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct BookingRoomRow {
    booking_id: i32,
    room_id: i32,
    name: String,
    capacity: i32,
    hotel_id: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn create(&self, user_id: i32, room_id: i32) -> AppResult<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO bookings (user_id, room_id) VALUES ($1, $2) RETURNING id",
        )
        .bind(user_id)
        .bind(room_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            // bookings.user_id is unique; a concurrent first booking loses here
            Some(db_err) if db_err.is_unique_violation() => AppError::forbidden(ALREADY_BOOKED),
            _ => AppError::from(e),
        })?;
        Ok(id)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(
            "SELECT id, user_id, room_id, created_at, updated_at FROM bookings WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(booking)
    }

    async fn find_by_user_id(&self, user_id: i32) -> AppResult<Option<BookingWithRoom>> {
        let row = sqlx::query_as::<_, BookingRoomRow>(
            r#"
            SELECT b.id AS booking_id, r.id AS room_id, r.name, r.capacity, r.hotel_id,
                   r.created_at, r.updated_at
            FROM bookings b
            JOIN rooms r ON r.id = b.room_id
            WHERE b.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| BookingWithRoom {
            id: r.booking_id,
            room: Room {
                id: r.room_id,
                name: r.name,
                capacity: r.capacity,
                hotel_id: r.hotel_id,
                created_at: r.created_at,
                updated_at: r.updated_at,
            },
        }))
    }

    async fn count_by_room_id(&self, room_id: i32) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bookings WHERE room_id = $1")
            .bind(room_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn update_room(&self, id: i32, room_id: i32) -> AppResult<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            "UPDATE bookings SET room_id = $2, updated_at = NOW() WHERE id = $1 RETURNING id",
        )
        .bind(id)
        .bind(room_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }
}
