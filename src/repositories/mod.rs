//! Persistence seams. Each entity gets a trait (what services may ask of the
//! store) and a `Pg*` implementation over the shared pool.

use std::sync::Arc;

use crate::database::Database;

pub mod addresses;
pub mod bookings;
pub mod enrollments;
pub mod events;
pub mod hotels;
pub mod payments;
pub mod rooms;
pub mod sessions;
pub mod tickets;
pub mod users;

#[cfg(test)]
mod fixtures;
#[cfg(test)]
pub mod memory;

pub use addresses::{AddressRepository, PgAddressRepository};
pub use bookings::{BookingRepository, PgBookingRepository};
pub use enrollments::{EnrollmentRepository, PgEnrollmentRepository};
pub use events::{EventRepository, PgEventRepository};
pub use hotels::{HotelRepository, PgHotelRepository};
pub use payments::{PaymentRepository, PgPaymentRepository};
pub use rooms::{PgRoomRepository, RoomRepository};
pub use sessions::{PgSessionRepository, SessionRepository};
pub use tickets::{PgTicketRepository, TicketRepository};
pub use users::{PgUserRepository, UserRepository};

/// One instance of every repository, built once at startup and handed to the services.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub events: Arc<dyn EventRepository>,
    pub enrollments: Arc<dyn EnrollmentRepository>,
    pub addresses: Arc<dyn AddressRepository>,
    pub tickets: Arc<dyn TicketRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub hotels: Arc<dyn HotelRepository>,
    pub rooms: Arc<dyn RoomRepository>,
    pub bookings: Arc<dyn BookingRepository>,
}

impl Repositories {
    pub fn postgres(db: &Database) -> Self {
        let pool = db.pool.clone();
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            sessions: Arc::new(PgSessionRepository::new(pool.clone())),
            events: Arc::new(PgEventRepository::new(pool.clone())),
            enrollments: Arc::new(PgEnrollmentRepository::new(pool.clone())),
            addresses: Arc::new(PgAddressRepository::new(pool.clone())),
            tickets: Arc::new(PgTicketRepository::new(pool.clone())),
            payments: Arc::new(PgPaymentRepository::new(pool.clone())),
            hotels: Arc::new(PgHotelRepository::new(pool.clone())),
            rooms: Arc::new(PgRoomRepository::new(pool.clone())),
            bookings: Arc::new(PgBookingRepository::new(pool)),
        }
    }
}
