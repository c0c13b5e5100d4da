use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: i32,
    pub name: String,
    pub cpf: String,
    pub birthday: NaiveDateTime,
    pub phone: String,
    pub user_id: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: i32,
    pub cep: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub number: String,
    pub neighborhood: String,
    pub address_detail: Option<String>,
    #[serde(skip_serializing)]
    pub enrollment_id: i32,
    #[serde(skip_serializing)]
    pub created_at: NaiveDateTime,
    #[serde(skip_serializing)]
    pub updated_at: NaiveDateTime,
}

/// Enrollment as returned to its owner: no user id or timestamps, first address inlined.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentWithAddress {
    pub id: i32,
    pub name: String,
    pub cpf: String,
    pub birthday: NaiveDateTime,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl EnrollmentWithAddress {
    pub fn new(enrollment: Enrollment, address: Option<Address>) -> Self {
        Self {
            id: enrollment.id,
            name: enrollment.name,
            cpf: enrollment.cpf,
            birthday: enrollment.birthday,
            phone: enrollment.phone,
            address,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnrollmentParams {
    pub name: String,
    pub cpf: String,
    pub birthday: NaiveDateTime,
    pub phone: String,
}

#[derive(Debug, Clone)]
pub struct AddressParams {
    pub cep: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub number: String,
    pub neighborhood: String,
    pub address_detail: Option<String>,
}
