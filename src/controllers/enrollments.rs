use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::sync::Arc;
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult};
use crate::middleware::{AuthUser, ValidatedJson};
use crate::models::{AddressParams, EnrollmentParams, EnrollmentWithAddress};
use crate::services::address_lookup::{normalize_cep, PostalAddress};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/enrollments", get(get_enrollment).post(upsert_enrollment))
        .route("/enrollments/cep", get(get_address_from_cep))
}

fn digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

fn parse_birthday(raw: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(raw)
        .map(|date| date.naive_utc())
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn validate_cpf(value: &str) -> Result<(), ValidationError> {
    let only_digits = value.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-');
    if only_digits && digits(value).len() == 11 {
        Ok(())
    } else {
        Err(ValidationError::new("cpf"))
    }
}

// (21) 98999-9999 or (21) 9899-9999, punctuation optional
fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let allowed = value.chars().all(|c| c.is_ascii_digit() || "()- ".contains(c));
    if allowed && matches!(digits(value).len(), 10 | 11) {
        Ok(())
    } else {
        Err(ValidationError::new("phone"))
    }
}

fn validate_cep(value: &str) -> Result<(), ValidationError> {
    normalize_cep(value).map(|_| ()).ok_or_else(|| ValidationError::new("cep"))
}

fn validate_birthday(value: &str) -> Result<(), ValidationError> {
    parse_birthday(value).map(|_| ()).ok_or_else(|| ValidationError::new("birthday"))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddressRequest {
    #[validate(custom(function = "validate_cep"))]
    pub cep: String,
    #[validate(length(min = 1))]
    pub street: String,
    #[validate(length(min = 1))]
    pub city: String,
    #[validate(length(min = 1))]
    pub number: String,
    #[validate(length(equal = 2))]
    pub state: String,
    #[validate(length(min = 1))]
    pub neighborhood: String,
    pub address_detail: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRequest {
    #[validate(length(min = 3))]
    pub name: String,
    #[validate(custom(function = "validate_cpf"))]
    pub cpf: String,
    #[validate(custom(function = "validate_birthday"))]
    pub birthday: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[validate(nested)]
    pub address: AddressRequest,
}

impl EnrollmentRequest {
    fn into_params(self) -> AppResult<(EnrollmentParams, AddressParams)> {
        let birthday = parse_birthday(&self.birthday).ok_or_else(|| AppError::invalid_data("birthday"))?;
        let address = self.address;
        let cep = normalize_cep(&address.cep).ok_or_else(|| AppError::invalid_data("cep"))?;

        let enrollment = EnrollmentParams {
            name: self.name,
            cpf: digits(&self.cpf),
            birthday,
            phone: self.phone,
        };
        let address = AddressParams {
            cep,
            street: address.street,
            city: address.city,
            state: address.state,
            number: address.number,
            neighborhood: address.neighborhood,
            address_detail: address.address_detail.filter(|detail| !detail.is_empty()),
        };
        Ok((enrollment, address))
    }
}

#[derive(Debug, Deserialize)]
pub struct CepQuery {
    pub cep: Option<String>,
}

async fn get_enrollment(State(state): State<Arc<AppState>>, user: AuthUser) -> AppResult<Json<EnrollmentWithAddress>> {
    Ok(Json(state.enrollments.enrollment_with_address(user.user_id).await?))
}

async fn upsert_enrollment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<EnrollmentRequest>,
) -> AppResult<Json<EnrollmentWithAddress>> {
    let (enrollment, address) = req.into_params()?;
    let saved = state
        .enrollments
        .upsert_enrollment(user.user_id, enrollment, address)
        .await?;
    Ok(Json(saved))
}

async fn get_address_from_cep(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CepQuery>,
) -> AppResult<Json<PostalAddress>> {
    let cep = query.cep.ok_or_else(|| AppError::invalid_data("cep"))?;
    Ok(Json(state.enrollments.postal_address(&cep).await?))
}
