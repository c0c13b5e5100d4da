use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{FromRow, PgPool};

use crate::error::AppResult;
use crate::models::{Address, Enrollment, EnrollmentParams, EnrollmentWithAddress};

#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    async fn find_with_address_by_user_id(&self, user_id: i32) -> AppResult<Option<EnrollmentWithAddress>>;
    async fn find_id_by_user_id(&self, user_id: i32) -> AppResult<Option<i32>>;
    /// Insert or update the enrollment keyed by `user_id`.
    async fn upsert(&self, user_id: i32, params: &EnrollmentParams) -> AppResult<Enrollment>;
}

pub struct PgEnrollmentRepository {
    pool: PgPool,
}

impl PgEnrollmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// enrollment LEFT JOIN addresses, address columns are all nullable
#[derive(FromRow)]
struct EnrollmentAddressRow {
    id: i32,
    name: String,
    cpf: String,
    birthday: NaiveDateTime,
    phone: String,
    user_id: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
    address_id: Option<i32>,
    cep: Option<String>,
    street: Option<String>,
    city: Option<String>,
    state: Option<String>,
    number: Option<String>,
    neighborhood: Option<String>,
    address_detail: Option<String>,
    address_created_at: Option<NaiveDateTime>,
    address_updated_at: Option<NaiveDateTime>,
}

impl From<EnrollmentAddressRow> for EnrollmentWithAddress {
    fn from(row: EnrollmentAddressRow) -> Self {
        let address = row.address_id.map(|address_id| Address {
            id: address_id,
            cep: row.cep.unwrap_or_default(),
            street: row.street.unwrap_or_default(),
            city: row.city.unwrap_or_default(),
            state: row.state.unwrap_or_default(),
            number: row.number.unwrap_or_default(),
            neighborhood: row.neighborhood.unwrap_or_default(),
            address_detail: row.address_detail,
            enrollment_id: row.id,
            created_at: row.address_created_at.unwrap_or(row.created_at),
            updated_at: row.address_updated_at.unwrap_or(row.updated_at),
        });

        let enrollment = Enrollment {
            id: row.id,
            name: row.name,
            cpf: row.cpf,
            birthday: row.birthday,
            phone: row.phone,
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        };

        EnrollmentWithAddress::new(enrollment, address)
    }
}

#[async_trait]
impl EnrollmentRepository for PgEnrollmentRepository {
    async fn find_with_address_by_user_id(&self, user_id: i32) -> AppResult<Option<EnrollmentWithAddress>> {
        let row = sqlx::query_as::<_, EnrollmentAddressRow>(
            r#"
            SELECT e.id, e.name, e.cpf, e.birthday, e.phone, e.user_id, e.created_at, e.updated_at,
                   a.id AS address_id, a.cep, a.street, a.city, a.state, a.number, a.neighborhood,
                   a.address_detail, a.created_at AS address_created_at, a.updated_at AS address_updated_at
            FROM enrollments e
            LEFT JOIN addresses a ON a.enrollment_id = e.id
            WHERE e.user_id = $1
            ORDER BY a.id
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(EnrollmentWithAddress::from))
    }

    async fn find_id_by_user_id(&self, user_id: i32) -> AppResult<Option<i32>> {
        let id = sqlx::query_scalar::<_, i32>("SELECT id FROM enrollments WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(id)
    }

    async fn upsert(&self, user_id: i32, params: &EnrollmentParams) -> AppResult<Enrollment> {
        let enrollment = sqlx::query_as::<_, Enrollment>(
            r#"
            INSERT INTO enrollments (name, cpf, birthday, phone, user_id)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO UPDATE
               SET name = EXCLUDED.name,
                   cpf = EXCLUDED.cpf,
                   birthday = EXCLUDED.birthday,
                   phone = EXCLUDED.phone,
                   updated_at = NOW()
            RETURNING id, name, cpf, birthday, phone, user_id, created_at, updated_at
            "#,
        )
        .bind(&params.name)
        .bind(&params.cpf)
        .bind(params.birthday)
        .bind(&params.phone)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(enrollment)
    }
}
