use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::{Validate, ValidationError};

use super::parse_id;
use crate::error::{AppError, AppResult};
use crate::middleware::{AuthUser, ValidatedJson};
use crate::models::Payment;
use crate::services::payments::CardPayment;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/payments", get(get_payment))
        .route("/payments/process", post(process_payment))
}

/// Card numbers and CVVs are accepted both as JSON numbers and as strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Digits {
    Number(u64),
    Text(String),
}

impl Digits {
    fn to_text(&self) -> String {
        match self {
            Digits::Number(n) => n.to_string(),
            Digits::Text(s) => s.chars().filter(|c| !c.is_whitespace()).collect(),
        }
    }
}

fn digit_count_between(value: &Digits, min: usize, max: usize) -> Result<(), ValidationError> {
    let text = value.to_text();
    if (min..=max).contains(&text.len()) && text.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("digits"))
    }
}

fn validate_card_number(value: &Digits) -> Result<(), ValidationError> {
    digit_count_between(value, 13, 19)
}

fn validate_cvv(value: &Digits) -> Result<(), ValidationError> {
    match value {
        Digits::Number(n) if *n <= 9999 => Ok(()),
        Digits::Number(_) => Err(ValidationError::new("cvv")),
        Digits::Text(_) => digit_count_between(value, 3, 4),
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CardDataRequest {
    #[validate(length(min = 1))]
    pub issuer: String,
    #[validate(custom(function = "validate_card_number"))]
    pub number: Digits,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub expiration_date: String,
    #[validate(custom(function = "validate_cvv"))]
    pub cvv: Digits,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProcessPaymentRequest {
    #[validate(range(min = 1))]
    pub ticket_id: i32,
    #[validate(nested)]
    pub card_data: CardDataRequest,
}

#[derive(Debug, Deserialize)]
pub struct PaymentQuery {
    #[serde(rename = "ticketId")]
    pub ticket_id: Option<String>,
}

async fn process_payment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<ProcessPaymentRequest>,
) -> AppResult<Json<Payment>> {
    let card = CardPayment {
        issuer: req.card_data.issuer,
        number: req.card_data.number.to_text(),
    };
    let payment = state.payments.process_payment(user.user_id, req.ticket_id, card).await?;
    Ok(Json(payment))
}

async fn get_payment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<PaymentQuery>,
) -> AppResult<Json<Payment>> {
    let ticket_id = query
        .ticket_id
        .as_deref()
        .ok_or_else(|| AppError::invalid_data("ticketId"))
        .and_then(|raw| parse_id(raw, "ticketId"))?;

    Ok(Json(state.payments.payment_for_ticket(user.user_id, ticket_id).await?))
}
