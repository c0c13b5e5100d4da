pub mod auth;
pub mod bookings;
pub mod enrollments;
pub mod events;
pub mod hotels;
pub mod payments;
pub mod tickets;
pub mod users;

use axum::Router;
use std::sync::Arc;

use crate::error::AppError;

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(events::routes())
        .merge(users::routes())
        .merge(auth::routes())
        .merge(enrollments::routes())
        .merge(tickets::routes())
        .merge(payments::routes())
        .merge(hotels::routes())
        .merge(bookings::routes())
}

// Path and query ids arrive as text so that "abc" becomes InvalidData, not a bare 400
fn parse_id(raw: &str, field: &str) -> Result<i32, AppError> {
    raw.trim().parse::<i32>().map_err(|_| AppError::invalid_data(field))
}
