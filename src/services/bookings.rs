//! Room booking: eligibility, capacity, then a single write.
//!
//! The capacity read and the insert/update are separate repository calls with
//! no lock between them, so two concurrent requests for the last bed in a room
//! can both be admitted.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::models::BookingWithRoom;
use crate::repositories::bookings::ALREADY_BOOKED;
use crate::repositories::BookingRepository;
use crate::services::capacity::CapacityChecker;
use crate::services::eligibility::{Eligibility, EligibilityChecker};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingId {
    pub booking_id: i32,
}

#[derive(Clone)]
pub struct BookingService {
    eligibility: EligibilityChecker,
    capacity: CapacityChecker,
    bookings: Arc<dyn BookingRepository>,
}

impl BookingService {
    pub fn new(
        eligibility: EligibilityChecker,
        capacity: CapacityChecker,
        bookings: Arc<dyn BookingRepository>,
    ) -> Self {
        Self { eligibility, capacity, bookings }
    }

    pub async fn create_booking(&self, user_id: i32, room_id: i32) -> AppResult<BookingId> {
        if room_id < 1 {
            return Err(AppError::invalid_data("roomId"));
        }

        if let Eligibility::Denied(reason) = self.eligibility.check(user_id).await? {
            debug!("User {} cannot book: {}", user_id, reason);
            return Err(AppError::forbidden(reason.to_string()));
        }

        if self.bookings.find_by_user_id(user_id).await?.is_some() {
            return Err(AppError::forbidden(ALREADY_BOOKED));
        }

        self.ensure_vacancy(room_id).await?;

        let booking_id = self.bookings.create(user_id, room_id).await?;
        info!("Created booking {} for user {} in room {}", booking_id, user_id, room_id);

        Ok(BookingId { booking_id })
    }

    pub async fn get_user_booking(&self, user_id: i32) -> AppResult<BookingWithRoom> {
        self.bookings
            .find_by_user_id(user_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn change_booking(&self, user_id: i32, booking_id: i32, room_id: i32) -> AppResult<BookingId> {
        if room_id < 1 {
            return Err(AppError::invalid_data("roomId"));
        }
        if booking_id < 1 {
            return Err(AppError::invalid_data("bookingId"));
        }

        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::forbidden("No booking"))?;

        if booking.user_id != user_id {
            return Err(AppError::forbidden("Not user's booking"));
        }

        self.ensure_vacancy(room_id).await?;

        let booking_id = self.bookings.update_room(booking.id, room_id).await?;
        info!(
            "Moved booking {} of user {} from room {} to room {}",
            booking_id, user_id, booking.room_id, room_id
        );

        Ok(BookingId { booking_id })
    }

    async fn ensure_vacancy(&self, room_id: i32) -> AppResult<()> {
        let room = self.capacity.check(room_id).await?;
        if !room.has_vacancy() {
            debug!(
                "Room {} is full ({}/{})",
                room.room_id, room.occupancy, room.capacity
            );
            return Err(AppError::forbidden("Room is full"));
        }
        Ok(())
    }
}
