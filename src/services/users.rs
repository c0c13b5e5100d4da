use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::User;
use crate::repositories::UserRepository;
use crate::services::events::EventService;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: i32,
    pub email: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self { id: user.id, email: user.email.clone() }
    }
}

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    events: EventService,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, events: EventService, bcrypt_cost: u32) -> Self {
        Self { users, events, bcrypt_cost }
    }

    /// Sign-up is open only once the event has started.
    pub async fn create_user(&self, email: &str, password: &str) -> AppResult<UserSummary> {
        let event = self.events.first_event().await?;
        if Utc::now().naive_utc() < event.starts_at {
            return Err(AppError::CannotEnrollBeforeStartDate);
        }

        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::Conflict("There is already an user with given email".to_string()));
        }

        let password = password.to_string();
        let cost = self.bcrypt_cost;
        let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .context("password hashing task failed")?
            .context("failed to hash password")?;

        let user = self.users.create(email, &hash).await?;
        info!("Registered user {}", user.id);

        Ok(UserSummary::from(&user))
    }
}
