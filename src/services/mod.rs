pub mod address_lookup;
pub mod auth;
pub mod bookings;
pub mod capacity;
pub mod eligibility;
pub mod enrollments;
pub mod events;
pub mod hotels;
pub mod payments;
pub mod tickets;
pub mod users;

pub use auth::AuthService;
pub use bookings::BookingService;
pub use enrollments::EnrollmentService;
pub use events::EventService;
pub use hotels::HotelService;
pub use payments::PaymentService;
pub use tickets::TicketService;
pub use users::UserService;
