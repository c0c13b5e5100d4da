use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use super::parse_id;
use crate::error::AppResult;
use crate::middleware::{AuthUser, ValidatedJson};
use crate::models::BookingWithRoom;
use crate::services::bookings::BookingId;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/booking", get(get_booking).post(create_booking))
        .route("/booking/{booking_id}", put(change_booking))
}

// roomId bounds are enforced by the booking service so the error names the field
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub room_id: i32,
}

async fn create_booking(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<BookingRequest>,
) -> AppResult<Json<BookingId>> {
    let booking = state.bookings.create_booking(user.user_id, req.room_id).await?;
    Ok(Json(booking))
}

async fn get_booking(State(state): State<Arc<AppState>>, user: AuthUser) -> AppResult<Json<BookingWithRoom>> {
    Ok(Json(state.bookings.get_user_booking(user.user_id).await?))
}

async fn change_booking(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(booking_id): Path<String>,
    ValidatedJson(req): ValidatedJson<BookingRequest>,
) -> AppResult<Json<BookingId>> {
    let booking_id = parse_id(&booking_id, "bookingId")?;
    let booking = state
        .bookings
        .change_booking(user.user_id, booking_id, req.room_id)
        .await?;
    Ok(Json(booking))
}
