//! In-process implementation of every repository trait, used by the service
//! and router tests. Mirrors the database's uniqueness rules.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};

use super::*;
use crate::error::{AppError, AppResult};
use crate::models::*;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    sessions: Vec<Session>,
    events: Vec<Event>,
    enrollments: Vec<Enrollment>,
    addresses: Vec<Address>,
    ticket_types: Vec<TicketType>,
    tickets: Vec<Ticket>,
    payments: Vec<Payment>,
    hotels: Vec<Hotel>,
    rooms: Vec<Room>,
    bookings: Vec<Booking>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn ticket_with_type(&self, ticket: &Ticket) -> Option<TicketWithType> {
        let ticket_type = self.ticket_types.iter().find(|t| t.id == ticket.ticket_type_id)?;
        Some(TicketWithType {
            ticket: ticket.clone(),
            ticket_type: ticket_type.clone(),
        })
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

fn conflict() -> AppError {
    AppError::Conflict("Resource already exists".to_string())
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn repositories(self: &Arc<Self>) -> Repositories {
        Repositories {
            users: self.clone(),
            sessions: self.clone(),
            events: self.clone(),
            enrollments: self.clone(),
            addresses: self.clone(),
            tickets: self.clone(),
            payments: self.clone(),
            hotels: self.clone(),
            rooms: self.clone(),
            bookings: self.clone(),
        }
    }

    /// Number of repository calls made through the traits so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    // Trait entry point: counts the call and locks the tables.
    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seed()
    }

    // Fixture access: does not count as a repository call.
    fn seed(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn insert_user(&self, email: &str, password_hash: &str) -> User {
        let mut t = self.seed();
        let user = User {
            id: t.next_id(),
            email: email.to_string(),
            password: password_hash.to_string(),
            created_at: now(),
            updated_at: now(),
        };
        t.users.push(user.clone());
        user
    }

    pub fn insert_event(&self, starts_at: NaiveDateTime, ends_at: NaiveDateTime) -> Event {
        let mut t = self.seed();
        let event = Event {
            id: t.next_id(),
            title: "Driven.t".to_string(),
            background_image_url: "linear-gradient(to right, #FA4098, #FFD77F)".to_string(),
            logo_image_url: "https://files.example.com/logo.png".to_string(),
            starts_at,
            ends_at,
            created_at: now(),
            updated_at: now(),
        };
        t.events.push(event.clone());
        event
    }

    pub fn insert_enrollment(&self, user_id: i32, name: &str) -> Enrollment {
        let mut t = self.seed();
        let enrollment = Enrollment {
            id: t.next_id(),
            name: name.to_string(),
            cpf: "12345678909".to_string(),
            birthday: now(),
            phone: "(21) 98999-9999".to_string(),
            user_id,
            created_at: now(),
            updated_at: now(),
        };
        t.enrollments.push(enrollment.clone());
        enrollment
    }

    pub fn insert_ticket_type(&self, is_remote: bool, includes_hotel: bool, price: i32) -> TicketType {
        let mut t = self.seed();
        let ticket_type = TicketType {
            id: t.next_id(),
            name: format!("remote={is_remote} hotel={includes_hotel}"),
            price,
            is_remote,
            includes_hotel,
            created_at: now(),
            updated_at: now(),
        };
        t.ticket_types.push(ticket_type.clone());
        ticket_type
    }

    pub fn insert_ticket(&self, enrollment_id: i32, ticket_type_id: i32, status: TicketStatus) -> Ticket {
        let mut t = self.seed();
        let ticket = Ticket {
            id: t.next_id(),
            ticket_type_id,
            enrollment_id,
            status,
            created_at: now(),
            updated_at: now(),
        };
        t.tickets.push(ticket.clone());
        ticket
    }

    pub fn insert_hotel(&self, name: &str) -> Hotel {
        let mut t = self.seed();
        let hotel = Hotel {
            id: t.next_id(),
            name: name.to_string(),
            image: "https://files.example.com/hotel.png".to_string(),
            created_at: now(),
            updated_at: now(),
        };
        t.hotels.push(hotel.clone());
        hotel
    }

    pub fn insert_room(&self, hotel_id: i32, capacity: i32) -> Room {
        let mut t = self.seed();
        let id = t.next_id();
        let room = Room {
            id,
            name: format!("Room {id}"),
            capacity,
            hotel_id,
            created_at: now(),
            updated_at: now(),
        };
        t.rooms.push(room.clone());
        room
    }

    pub fn insert_booking(&self, user_id: i32, room_id: i32) -> Booking {
        let mut t = self.seed();
        let booking = Booking {
            id: t.next_id(),
            user_id,
            room_id,
            created_at: now(),
            updated_at: now(),
        };
        t.bookings.push(booking.clone());
        booking
    }

    pub fn booking(&self, id: i32) -> Option<Booking> {
        self.seed().bookings.iter().find(|b| b.id == id).cloned()
    }

    pub fn ticket_status(&self, id: i32) -> Option<TicketStatus> {
        self.seed().tickets.iter().find(|t| t.id == id).map(|t| t.status)
    }

    pub fn payment_count(&self) -> usize {
        self.seed().payments.len()
    }

    pub fn booking_count_for_room(&self, room_id: i32) -> usize {
        self.seed().bookings.iter().filter(|b| b.room_id == room_id).count()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.tables().users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, email: &str, password_hash: &str) -> AppResult<User> {
        let mut t = self.tables();
        if t.users.iter().any(|u| u.email == email) {
            return Err(conflict());
        }
        let user = User {
            id: t.next_id(),
            email: email.to_string(),
            password: password_hash.to_string(),
            created_at: now(),
            updated_at: now(),
        };
        t.users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl SessionRepository for MemoryStore {
    async fn create(&self, user_id: i32, token: &str) -> AppResult<Session> {
        let mut t = self.tables();
        let session = Session {
            id: t.next_id(),
            user_id,
            token: token.to_string(),
            created_at: now(),
            updated_at: now(),
        };
        t.sessions.push(session.clone());
        Ok(session)
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<Session>> {
        Ok(self.tables().sessions.iter().find(|s| s.token == token).cloned())
    }
}

#[async_trait]
impl EventRepository for MemoryStore {
    async fn find_first(&self) -> AppResult<Option<Event>> {
        Ok(self.tables().events.first().cloned())
    }
}

#[async_trait]
impl EnrollmentRepository for MemoryStore {
    async fn find_with_address_by_user_id(&self, user_id: i32) -> AppResult<Option<EnrollmentWithAddress>> {
        let t = self.tables();
        let Some(enrollment) = t.enrollments.iter().find(|e| e.user_id == user_id).cloned() else {
            return Ok(None);
        };
        let address = t.addresses.iter().find(|a| a.enrollment_id == enrollment.id).cloned();
        Ok(Some(EnrollmentWithAddress::new(enrollment, address)))
    }

    async fn find_id_by_user_id(&self, user_id: i32) -> AppResult<Option<i32>> {
        Ok(self.tables().enrollments.iter().find(|e| e.user_id == user_id).map(|e| e.id))
    }

    async fn upsert(&self, user_id: i32, params: &EnrollmentParams) -> AppResult<Enrollment> {
        let mut t = self.tables();
        if let Some(existing) = t.enrollments.iter_mut().find(|e| e.user_id == user_id) {
            existing.name = params.name.clone();
            existing.cpf = params.cpf.clone();
            existing.birthday = params.birthday;
            existing.phone = params.phone.clone();
            existing.updated_at = now();
            return Ok(existing.clone());
        }
        let enrollment = Enrollment {
            id: t.next_id(),
            name: params.name.clone(),
            cpf: params.cpf.clone(),
            birthday: params.birthday,
            phone: params.phone.clone(),
            user_id,
            created_at: now(),
            updated_at: now(),
        };
        t.enrollments.push(enrollment.clone());
        Ok(enrollment)
    }
}

#[async_trait]
impl AddressRepository for MemoryStore {
    async fn upsert(&self, enrollment_id: i32, params: &AddressParams) -> AppResult<Address> {
        let mut t = self.tables();
        let id = match t.addresses.iter().position(|a| a.enrollment_id == enrollment_id) {
            Some(index) => {
                let id = t.addresses[index].id;
                t.addresses.remove(index);
                id
            }
            None => t.next_id(),
        };
        let address = Address {
            id,
            cep: params.cep.clone(),
            street: params.street.clone(),
            city: params.city.clone(),
            state: params.state.clone(),
            number: params.number.clone(),
            neighborhood: params.neighborhood.clone(),
            address_detail: params.address_detail.clone(),
            enrollment_id,
            created_at: now(),
            updated_at: now(),
        };
        t.addresses.push(address.clone());
        Ok(address)
    }
}

#[async_trait]
impl TicketRepository for MemoryStore {
    async fn find_types(&self) -> AppResult<Vec<TicketType>> {
        Ok(self.tables().ticket_types.clone())
    }

    async fn find_type_by_id(&self, id: i32) -> AppResult<Option<TicketType>> {
        Ok(self.tables().ticket_types.iter().find(|t| t.id == id).cloned())
    }

    async fn create(&self, enrollment_id: i32, ticket_type_id: i32) -> AppResult<TicketWithType> {
        let mut t = self.tables();
        if t.tickets.iter().any(|tk| tk.enrollment_id == enrollment_id) {
            return Err(conflict());
        }
        let ticket = Ticket {
            id: t.next_id(),
            ticket_type_id,
            enrollment_id,
            status: TicketStatus::Reserved,
            created_at: now(),
            updated_at: now(),
        };
        t.tickets.push(ticket.clone());
        t.ticket_with_type(&ticket)
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("ticket type {ticket_type_id} missing")))
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<TicketWithType>> {
        let t = self.tables();
        Ok(t.tickets.iter().find(|tk| tk.id == id).and_then(|tk| t.ticket_with_type(tk)))
    }

    async fn find_by_enrollment_id(&self, enrollment_id: i32) -> AppResult<Option<TicketWithType>> {
        let t = self.tables();
        Ok(t.tickets
            .iter()
            .find(|tk| tk.enrollment_id == enrollment_id)
            .and_then(|tk| t.ticket_with_type(tk)))
    }
}

#[async_trait]
impl PaymentRepository for MemoryStore {
    async fn find_by_ticket_id(&self, ticket_id: i32) -> AppResult<Option<Payment>> {
        Ok(self.tables().payments.iter().find(|p| p.ticket_id == ticket_id).cloned())
    }

    async fn create_and_mark_paid(&self, payment: &NewPayment) -> AppResult<Payment> {
        let mut t = self.tables();
        if t.payments.iter().any(|p| p.ticket_id == payment.ticket_id) {
            return Err(conflict());
        }
        let ticket = t
            .tickets
            .iter_mut()
            .find(|tk| tk.id == payment.ticket_id)
            .ok_or(AppError::NotFound)?;
        ticket.status = TicketStatus::Paid;
        ticket.updated_at = now();

        let stored = Payment {
            id: t.next_id(),
            ticket_id: payment.ticket_id,
            value: payment.value,
            card_issuer: payment.card_issuer.clone(),
            card_last_digits: payment.card_last_digits.clone(),
            created_at: now(),
            updated_at: now(),
        };
        t.payments.push(stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl HotelRepository for MemoryStore {
    async fn find_many(&self) -> AppResult<Vec<Hotel>> {
        Ok(self.tables().hotels.clone())
    }

    async fn find_by_id_with_rooms(&self, id: i32) -> AppResult<Option<HotelWithRooms>> {
        let t = self.tables();
        Ok(t.hotels.iter().find(|h| h.id == id).map(|hotel| HotelWithRooms {
            hotel: hotel.clone(),
            rooms: t.rooms.iter().filter(|r| r.hotel_id == id).cloned().collect(),
        }))
    }
}

#[async_trait]
impl RoomRepository for MemoryStore {
    async fn find_capacity_by_id(&self, id: i32) -> AppResult<Option<RoomCapacity>> {
        Ok(self
            .tables()
            .rooms
            .iter()
            .find(|r| r.id == id)
            .map(|r| RoomCapacity { id: r.id, capacity: r.capacity }))
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn create(&self, user_id: i32, room_id: i32) -> AppResult<i32> {
        let mut t = self.tables();
        if t.bookings.iter().any(|b| b.user_id == user_id) {
            return Err(AppError::forbidden(bookings::ALREADY_BOOKED));
        }
        let id = t.next_id();
        t.bookings.push(Booking {
            id,
            user_id,
            room_id,
            created_at: now(),
            updated_at: now(),
        });
        Ok(id)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Booking>> {
        Ok(self.tables().bookings.iter().find(|b| b.id == id).cloned())
    }

    async fn find_by_user_id(&self, user_id: i32) -> AppResult<Option<BookingWithRoom>> {
        let t = self.tables();
        let Some(booking) = t.bookings.iter().find(|b| b.user_id == user_id) else {
            return Ok(None);
        };
        Ok(t.rooms.iter().find(|r| r.id == booking.room_id).map(|room| BookingWithRoom {
            id: booking.id,
            room: room.clone(),
        }))
    }

    async fn count_by_room_id(&self, room_id: i32) -> AppResult<i64> {
        Ok(self.tables().bookings.iter().filter(|b| b.room_id == room_id).count() as i64)
    }

    async fn update_room(&self, id: i32, room_id: i32) -> AppResult<i32> {
        let mut t = self.tables();
        let booking = t.bookings.iter_mut().find(|b| b.id == id).ok_or(AppError::NotFound)?;
        booking.room_id = room_id;
        booking.updated_at = now();
        Ok(id)
    }
}
