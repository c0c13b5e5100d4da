//! Row seeding for the `#[sqlx::test]` repository tests.

use sqlx::PgPool;

use crate::models::TicketStatus;

pub async fn insert_user(pool: &PgPool, email: &str) -> sqlx::Result<i32> {
    sqlx::query_scalar::<_, i32>("INSERT INTO users (email, password) VALUES ($1, 'hash') RETURNING id")
        .bind(email)
        .fetch_one(pool)
        .await
}

pub async fn insert_enrollment(pool: &PgPool, user_id: i32) -> sqlx::Result<i32> {
    sqlx::query_scalar::<_, i32>(
        "INSERT INTO enrollments (name, cpf, birthday, phone, user_id)
         VALUES ('Guest', '12345678909', '1995-04-12', '(21) 98999-9999', $1)
         RETURNING id",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
}

pub async fn insert_ticket_type(pool: &PgPool, is_remote: bool, includes_hotel: bool, price: i32) -> sqlx::Result<i32> {
    sqlx::query_scalar::<_, i32>(
        "INSERT INTO ticket_types (name, price, is_remote, includes_hotel)
         VALUES ('Presencial', $1, $2, $3)
         RETURNING id",
    )
    .bind(price)
    .bind(is_remote)
    .bind(includes_hotel)
    .fetch_one(pool)
    .await
}

pub async fn insert_ticket(
    pool: &PgPool,
    enrollment_id: i32,
    ticket_type_id: i32,
    status: TicketStatus,
) -> sqlx::Result<i32> {
    sqlx::query_scalar::<_, i32>(
        "INSERT INTO tickets (ticket_type_id, enrollment_id, status) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(ticket_type_id)
    .bind(enrollment_id)
    .bind(status)
    .fetch_one(pool)
    .await
}

pub async fn ticket_status(pool: &PgPool, ticket_id: i32) -> sqlx::Result<TicketStatus> {
    sqlx::query_scalar::<_, TicketStatus>("SELECT status FROM tickets WHERE id = $1")
        .bind(ticket_id)
        .fetch_one(pool)
        .await
}

pub async fn insert_hotel(pool: &PgPool, name: &str) -> sqlx::Result<i32> {
    sqlx::query_scalar::<_, i32>("INSERT INTO hotels (name, image) VALUES ($1, 'https://example.com/hotel.png') RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
}

pub async fn insert_room(pool: &PgPool, hotel_id: i32, name: &str, capacity: i32) -> sqlx::Result<i32> {
    sqlx::query_scalar::<_, i32>("INSERT INTO rooms (name, capacity, hotel_id) VALUES ($1, $2, $3) RETURNING id")
        .bind(name)
        .bind(capacity)
        .bind(hotel_id)
        .fetch_one(pool)
        .await
}
