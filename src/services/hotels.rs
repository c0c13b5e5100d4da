use std::sync::Arc;

use tracing::debug;

use crate::cache::CacheService;
use crate::error::{AppError, AppResult};
use crate::models::{Hotel, HotelWithRooms};
use crate::repositories::HotelRepository;
use crate::services::eligibility::{DenialReason, Eligibility, EligibilityChecker};

#[derive(Clone)]
pub struct HotelService {
    eligibility: EligibilityChecker,
    hotels: Arc<dyn HotelRepository>,
    cache: Option<CacheService>,
}

impl HotelService {
    pub fn new(eligibility: EligibilityChecker, hotels: Arc<dyn HotelRepository>, cache: Option<CacheService>) -> Self {
        Self { eligibility, hotels, cache }
    }

    pub async fn list_hotels(&self, user_id: i32) -> AppResult<Vec<Hotel>> {
        self.ensure_hotel_access(user_id).await?;

        let hotels = match self.cached_hotels().await {
            Some(hotels) => hotels,
            None => {
                let hotels = self.hotels.find_many().await?;
                if let Some(cache) = &self.cache {
                    cache.save_hotels(&hotels).await;
                }
                hotels
            }
        };

        if hotels.is_empty() {
            return Err(AppError::NotFound);
        }
        Ok(hotels)
    }

    pub async fn hotel_with_rooms(&self, user_id: i32, hotel_id: i32) -> AppResult<HotelWithRooms> {
        if hotel_id < 1 {
            return Err(AppError::invalid_data("hotelId"));
        }

        self.ensure_hotel_access(user_id).await?;

        self.hotels
            .find_by_id_with_rooms(hotel_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn cached_hotels(&self) -> Option<Vec<Hotel>> {
        self.cache.as_ref()?.get_hotels().await
    }

    // Missing enrollment or ticket reads as "nothing to show"; an unusable ticket asks for payment.
    async fn ensure_hotel_access(&self, user_id: i32) -> AppResult<()> {
        match self.eligibility.check(user_id).await? {
            Eligibility::Eligible => Ok(()),
            Eligibility::Denied(DenialReason::NoEnrollment | DenialReason::NoTicket) => Err(AppError::NotFound),
            Eligibility::Denied(DenialReason::TicketNotUsable) => {
                debug!("User {} ticket does not cover hotels", user_id);
                Err(AppError::PaymentRequired)
            }
        }
    }
}
