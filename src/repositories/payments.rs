use async_trait::async_trait;
use sqlx::PgPool;
use tracing::error;

use crate::error::AppResult;
use crate::models::{NewPayment, Payment};

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn find_by_ticket_id(&self, ticket_id: i32) -> AppResult<Option<Payment>>;
    /// Flip the ticket to `PAID` and store the payment as one unit of work.
    async fn create_and_mark_paid(&self, payment: &NewPayment) -> AppResult<Payment>;
}

pub struct PgPaymentRepository {
    pool: PgPool,
}

impl PgPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentRepository for PgPaymentRepository {
    async fn find_by_ticket_id(&self, ticket_id: i32) -> AppResult<Option<Payment>> {
        let payment = sqlx::query_as::<_, Payment>(
            "SELECT id, ticket_id, value, card_issuer, card_last_digits, created_at, updated_at
             FROM payments
             WHERE ticket_id = $1",
        )
        .bind(ticket_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(payment)
    }

    async fn create_and_mark_paid(&self, payment: &NewPayment) -> AppResult<Payment> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE tickets SET status = 'PAID', updated_at = NOW() WHERE id = $1")
            .bind(payment.ticket_id)
            .execute(&mut *tx)
            .await?;

        let inserted = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (ticket_id, value, card_issuer, card_last_digits)
            VALUES ($1, $2, $3, $4)
            RETURNING id, ticket_id, value, card_issuer, card_last_digits, created_at, updated_at
            "#,
        )
        .bind(payment.ticket_id)
        .bind(payment.value)
        .bind(&payment.card_issuer)
        .bind(&payment.card_last_digits)
        .fetch_one(&mut *tx)
        .await;

        // dropping the transaction on error rolls the status change back
        let inserted = inserted.map_err(|e| {
            error!("Payment insert failed for ticket {}: {:?}", payment.ticket_id, e);
            e
        })?;

        tx.commit().await?;
        Ok(inserted)
    }
}
