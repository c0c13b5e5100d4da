use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{FromRow, PgPool};

use crate::error::AppResult;
use crate::models::{Ticket, TicketStatus, TicketType, TicketWithType};

#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn find_types(&self) -> AppResult<Vec<TicketType>>;
    async fn find_type_by_id(&self, id: i32) -> AppResult<Option<TicketType>>;
    /// New tickets always start out `RESERVED`.
    async fn create(&self, enrollment_id: i32, ticket_type_id: i32) -> AppResult<TicketWithType>;
    async fn find_by_id(&self, id: i32) -> AppResult<Option<TicketWithType>>;
    async fn find_by_enrollment_id(&self, enrollment_id: i32) -> AppResult<Option<TicketWithType>>;
}

pub struct PgTicketRepository {
    pool: PgPool,
}

impl PgTicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const TICKET_WITH_TYPE_COLUMNS: &str = r#"
    t.id, t.ticket_type_id, t.enrollment_id, t.status, t.created_at, t.updated_at,
    tt.name AS type_name, tt.price, tt.is_remote, tt.includes_hotel,
    tt.created_at AS type_created_at, tt.updated_at AS type_updated_at
"#;

#[derive(FromRow)]
struct TicketWithTypeRow {
    id: i32,
    ticket_type_id: i32,
    enrollment_id: i32,
    status: TicketStatus,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
    type_name: String,
    price: i32,
    is_remote: bool,
    includes_hotel: bool,
    type_created_at: NaiveDateTime,
    type_updated_at: NaiveDateTime,
}

impl From<TicketWithTypeRow> for TicketWithType {
    fn from(row: TicketWithTypeRow) -> Self {
        TicketWithType {
            ticket: Ticket {
                id: row.id,
                ticket_type_id: row.ticket_type_id,
                enrollment_id: row.enrollment_id,
                status: row.status,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            ticket_type: TicketType {
                id: row.ticket_type_id,
                name: row.type_name,
                price: row.price,
                is_remote: row.is_remote,
                includes_hotel: row.includes_hotel,
                created_at: row.type_created_at,
                updated_at: row.type_updated_at,
            },
        }
    }
}

#[async_trait]
impl TicketRepository for PgTicketRepository {
    async fn find_types(&self) -> AppResult<Vec<TicketType>> {
        let types = sqlx::query_as::<_, TicketType>(
            "SELECT id, name, price, is_remote, includes_hotel, created_at, updated_at
             FROM ticket_types
             ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(types)
    }

    async fn find_type_by_id(&self, id: i32) -> AppResult<Option<TicketType>> {
        let ticket_type = sqlx::query_as::<_, TicketType>(
            "SELECT id, name, price, is_remote, includes_hotel, created_at, updated_at
             FROM ticket_types
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(ticket_type)
    }

    async fn create(&self, enrollment_id: i32, ticket_type_id: i32) -> AppResult<TicketWithType> {
        let query = format!(
            r#"
            WITH t AS (
                INSERT INTO tickets (ticket_type_id, enrollment_id, status)
                VALUES ($1, $2, 'RESERVED')
                RETURNING *
            )
            SELECT {TICKET_WITH_TYPE_COLUMNS}
            FROM t
            JOIN ticket_types tt ON tt.id = t.ticket_type_id
            "#
        );
        let row = sqlx::query_as::<_, TicketWithTypeRow>(&query)
            .bind(ticket_type_id)
            .bind(enrollment_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<TicketWithType>> {
        let query = format!(
            "SELECT {TICKET_WITH_TYPE_COLUMNS}
             FROM tickets t
             JOIN ticket_types tt ON tt.id = t.ticket_type_id
             WHERE t.id = $1"
        );
        let row = sqlx::query_as::<_, TicketWithTypeRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(TicketWithType::from))
    }

    async fn find_by_enrollment_id(&self, enrollment_id: i32) -> AppResult<Option<TicketWithType>> {
        let query = format!(
            "SELECT {TICKET_WITH_TYPE_COLUMNS}
             FROM tickets t
             JOIN ticket_types tt ON tt.id = t.ticket_type_id
             WHERE t.enrollment_id = $1"
        );
        let row = sqlx::query_as::<_, TicketWithTypeRow>(&query)
            .bind(enrollment_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(TicketWithType::from))
    }
}
