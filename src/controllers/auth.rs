use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::ValidatedJson;
use crate::services::auth::SignIn;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/auth/sign-in", post(sign_in))
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

async fn sign_in(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<SignInRequest>,
) -> AppResult<Json<SignIn>> {
    Ok(Json(state.auth.sign_in(&req.email, &req.password).await?))
}
