use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::repositories::{BookingRepository, RoomRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoomOccupancy {
    pub room_id: i32,
    pub capacity: i32,
    pub occupancy: i64,
}

impl RoomOccupancy {
    /// One more booking fits only while occupancy is strictly below capacity.
    pub fn has_vacancy(&self) -> bool {
        self.occupancy < i64::from(self.capacity)
    }
}

#[derive(Clone)]
pub struct CapacityChecker {
    rooms: Arc<dyn RoomRepository>,
    bookings: Arc<dyn BookingRepository>,
}

impl CapacityChecker {
    pub fn new(rooms: Arc<dyn RoomRepository>, bookings: Arc<dyn BookingRepository>) -> Self {
        Self { rooms, bookings }
    }

    pub async fn check(&self, room_id: i32) -> AppResult<RoomOccupancy> {
        let room = self
            .rooms
            .find_capacity_by_id(room_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let occupancy = self.bookings.count_by_room_id(room.id).await?;

        Ok(RoomOccupancy {
            room_id: room.id,
            capacity: room.capacity,
            occupancy,
        })
    }
}
