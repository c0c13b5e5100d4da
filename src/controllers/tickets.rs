use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::{AuthUser, ValidatedJson};
use crate::models::{TicketType, TicketWithType};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tickets", get(get_ticket).post(create_ticket))
        .route("/tickets/types", get(get_ticket_types))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketRequest {
    #[validate(range(min = 1))]
    pub ticket_type_id: i32,
}

async fn get_ticket_types(State(state): State<Arc<AppState>>, _user: AuthUser) -> AppResult<Json<Vec<TicketType>>> {
    Ok(Json(state.tickets.ticket_types().await?))
}

async fn get_ticket(State(state): State<Arc<AppState>>, user: AuthUser) -> AppResult<Json<TicketWithType>> {
    Ok(Json(state.tickets.user_ticket(user.user_id).await?))
}

async fn create_ticket(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateTicketRequest>,
) -> AppResult<(StatusCode, Json<TicketWithType>)> {
    let ticket = state.tickets.create_ticket(user.user_id, req.ticket_type_id).await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}
