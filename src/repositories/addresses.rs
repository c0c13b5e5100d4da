use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AppResult;
use crate::models::{Address, AddressParams};

#[async_trait]
pub trait AddressRepository: Send + Sync {
    /// Insert or update the address keyed by `enrollment_id`.
    async fn upsert(&self, enrollment_id: i32, params: &AddressParams) -> AppResult<Address>;
}

pub struct PgAddressRepository {
    pool: PgPool,
}

impl PgAddressRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AddressRepository for PgAddressRepository {
    async fn upsert(&self, enrollment_id: i32, params: &AddressParams) -> AppResult<Address> {
        let address = sqlx::query_as::<_, Address>(
            r#"
            INSERT INTO addresses (cep, street, city, state, number, neighborhood, address_detail, enrollment_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (enrollment_id) DO UPDATE
               SET cep = EXCLUDED.cep,
                   street = EXCLUDED.street,
                   city = EXCLUDED.city,
                   state = EXCLUDED.state,
                   number = EXCLUDED.number,
                   neighborhood = EXCLUDED.neighborhood,
                   address_detail = EXCLUDED.address_detail,
                   updated_at = NOW()
            RETURNING id, cep, street, city, state, number, neighborhood, address_detail,
                      enrollment_id, created_at, updated_at
            "#,
        )
        .bind(&params.cep)
        .bind(&params.street)
        .bind(&params.city)
        .bind(&params.state)
        .bind(&params.number)
        .bind(&params.neighborhood)
        .bind(&params.address_detail)
        .bind(enrollment_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(address)
    }
}
