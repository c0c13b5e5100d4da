use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: i32,
    pub ticket_id: i32,
    pub value: i32,
    pub card_issuer: String,
    pub card_last_digits: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// What gets persisted from a card payment. The full card number never reaches this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    pub ticket_id: i32,
    pub value: i32,
    pub card_issuer: String,
    pub card_last_digits: String,
}
