use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use super::parse_id;
use crate::error::AppResult;
use crate::middleware::AuthUser;
use crate::models::{Hotel, HotelWithRooms};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/hotels", get(list_hotels))
        .route("/hotels/{hotel_id}", get(get_hotel))
}

async fn list_hotels(State(state): State<Arc<AppState>>, user: AuthUser) -> AppResult<Json<Vec<Hotel>>> {
    Ok(Json(state.hotels.list_hotels(user.user_id).await?))
}

async fn get_hotel(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(hotel_id): Path<String>,
) -> AppResult<Json<HotelWithRooms>> {
    let hotel_id = parse_id(&hotel_id, "hotelId")?;
    Ok(Json(state.hotels.hotel_with_rooms(user.user_id, hotel_id).await?))
}
