//! Sign-in and bearer-token verification. Tokens are HS256 JWTs that are only
//! honored while a matching session row exists.

use std::sync::Arc;

use anyhow::Context;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::cache::CacheService;
use crate::config::JwtConfig;
use crate::error::{AppError, AppResult};
use crate::repositories::{SessionRepository, UserRepository};
use crate::services::users::UserSummary;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(rename = "userId")]
    user_id: i32,
    jti: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignIn {
    pub user: UserSummary,
    pub token: String,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn SessionRepository>,
    cache: Option<CacheService>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionRepository>,
        cache: Option<CacheService>,
        jwt: &JwtConfig,
    ) -> Self {
        Self {
            users,
            sessions,
            cache,
            encoding_key: EncodingKey::from_secret(jwt.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt.secret.as_bytes()),
            token_ttl: Duration::hours(jwt.expires_in_hours),
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<SignIn> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let candidate = password.to_string();
        let stored = user.clone();
        let valid = tokio::task::spawn_blocking(move || stored.verify_password(&candidate))
            .await
            .context("password verification task failed")?;
        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.issue_session(user.id).await?;
        info!("User {} signed in", user.id);

        Ok(SignIn {
            user: UserSummary::from(&user),
            token,
        })
    }

    /// Signs a fresh token for `user_id` and records it as a session.
    pub async fn issue_session(&self, user_id: i32) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            user_id,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key).context("failed to sign token")?;
        self.sessions.create(user_id, &token).await?;

        if let Some(cache) = &self.cache {
            cache.cache_session(&token, user_id).await;
        }
        Ok(token)
    }

    /// Resolves a bearer token to its user id.
    pub async fn authenticate(&self, token: &str) -> AppResult<i32> {
        let claims = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| {
                debug!("Rejected token: {}", e);
                AppError::Unauthorized
            })?
            .claims;

        if let Some(cache) = &self.cache {
            if cache.get_cached_session(token).await == Some(claims.user_id) {
                return Ok(claims.user_id);
            }
        }

        let session = self
            .sessions
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)?;
        if session.user_id != claims.user_id {
            return Err(AppError::Unauthorized);
        }

        if let Some(cache) = &self.cache {
            cache.cache_session(token, session.user_id).await;
        }
        Ok(session.user_id)
    }
}
