pub mod booking;
pub mod enrollment;
pub mod event;
pub mod hotel;
pub mod payment;
pub mod ticket;
pub mod user;

pub use booking::{Booking, BookingWithRoom};
pub use enrollment::{Address, AddressParams, Enrollment, EnrollmentParams, EnrollmentWithAddress};
pub use event::Event;
pub use hotel::{Hotel, HotelWithRooms, Room, RoomCapacity};
pub use payment::{NewPayment, Payment};
pub use ticket::{Ticket, TicketStatus, TicketType, TicketWithType};
pub use user::{Session, User};
