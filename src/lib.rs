pub mod cache;
pub mod config;
pub mod controllers;
pub mod database;
pub mod error;
pub mod middleware;
pub mod models;
pub mod redis_client;
pub mod repositories;
pub mod services;

#[cfg(test)]
mod testing;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::cache::CacheService;
use crate::config::{AuthConfig, JwtConfig};
use crate::repositories::Repositories;
use crate::services::address_lookup::PostalCodeLookup;
use crate::services::capacity::CapacityChecker;
use crate::services::eligibility::EligibilityChecker;
use crate::services::{
    AuthService, BookingService, EnrollmentService, EventService, HotelService, PaymentService, TicketService,
    UserService,
};

// Shared state for every request handler
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub users: UserService,
    pub events: EventService,
    pub enrollments: EnrollmentService,
    pub tickets: TicketService,
    pub payments: PaymentService,
    pub hotels: HotelService,
    pub bookings: BookingService,
}

impl AppState {
    pub fn new(
        repos: Repositories,
        postal: Arc<dyn PostalCodeLookup>,
        cache: Option<CacheService>,
        jwt: &JwtConfig,
        auth: &AuthConfig,
    ) -> Self {
        let eligibility = EligibilityChecker::new(repos.enrollments.clone(), repos.tickets.clone());
        let capacity = CapacityChecker::new(repos.rooms.clone(), repos.bookings.clone());
        let events = EventService::new(repos.events.clone(), cache.clone());

        Self {
            auth: AuthService::new(repos.users.clone(), repos.sessions.clone(), cache.clone(), jwt),
            users: UserService::new(repos.users.clone(), events.clone(), auth.bcrypt_cost),
            events,
            enrollments: EnrollmentService::new(repos.enrollments.clone(), repos.addresses.clone(), postal),
            tickets: TicketService::new(repos.enrollments.clone(), repos.tickets.clone(), cache.clone()),
            payments: PaymentService::new(repos.enrollments.clone(), repos.tickets.clone(), repos.payments.clone()),
            hotels: HotelService::new(eligibility.clone(), repos.hotels.clone(), cache),
            bookings: BookingService::new(eligibility, capacity, repos.bookings.clone()),
        }
    }
}

/// Full HTTP surface: public routes, authenticated routes, tracing and CORS.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK!" }))
        .merge(controllers::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
