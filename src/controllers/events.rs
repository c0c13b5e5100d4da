use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

use crate::error::AppResult;
use crate::models::Event;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/event", get(get_event))
}

async fn get_event(State(state): State<Arc<AppState>>) -> AppResult<Json<Event>> {
    Ok(Json(state.events.first_event().await?))
}
