//! Router-level test harness: the real `app()` wired to in-memory repositories.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use serde_json::Value;
use tower::ServiceExt;

use crate::config::{AuthConfig, JwtConfig};
use crate::models::{Ticket, TicketStatus, User};
use crate::repositories::memory::MemoryStore;
use crate::services::address_lookup::{LookupError, PostalAddress, PostalCodeLookup};
use crate::{app, AppState};

pub const KNOWN_CEP: &str = "01001000";

/// Resolves `KNOWN_CEP` only.
struct StaticPostalLookup;

#[async_trait]
impl PostalCodeLookup for StaticPostalLookup {
    async fn lookup(&self, cep: &str) -> Result<Option<PostalAddress>, LookupError> {
        Ok((cep == KNOWN_CEP).then(|| PostalAddress {
            street: "Praça da Sé".to_string(),
            complement: "lado ímpar".to_string(),
            neighborhood: "Sé".to_string(),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
        }))
    }
}

pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub state: Arc<AppState>,
    router: Router,
}

impl TestContext {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let jwt = JwtConfig {
            secret: "test-secret".to_string(),
            expires_in_hours: 1,
        };
        let auth = AuthConfig { bcrypt_cost: 4 };
        let state = Arc::new(AppState::new(
            store.repositories(),
            Arc::new(StaticPostalLookup),
            None,
            &jwt,
            &auth,
        ));
        let router = app(state.clone());
        Self { store, state, router }
    }

    /// Sends one request through the router. Non-JSON bodies come back as `Value::String`.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    pub fn user_with_password(&self, password: &str) -> User {
        let email: String = SafeEmail().fake();
        let hash = bcrypt::hash(password, 4).unwrap();
        self.store.insert_user(&email, &hash)
    }

    /// A fresh user plus a valid bearer token for them.
    pub async fn signed_in_user(&self) -> (User, String) {
        let email: String = SafeEmail().fake();
        let user = self.store.insert_user(&email, "unused");
        let token = self.state.auth.issue_session(user.id).await.unwrap();
        (user, token)
    }

    /// Enrollment plus ticket for `user_id`, with a ticket type built from the flags.
    pub fn give_ticket(&self, user_id: i32, status: TicketStatus, is_remote: bool, includes_hotel: bool) -> Ticket {
        let name: String = Name().fake();
        let enrollment = self.store.insert_enrollment(user_id, &name);
        let ticket_type = self.store.insert_ticket_type(is_remote, includes_hotel, 600);
        self.store.insert_ticket(enrollment.id, ticket_type.id, status)
    }
}
