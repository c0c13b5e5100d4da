use std::sync::Arc;

use crate::cache::CacheService;
use crate::error::{AppError, AppResult};
use crate::models::Event;
use crate::repositories::EventRepository;

#[derive(Clone)]
pub struct EventService {
    events: Arc<dyn EventRepository>,
    cache: Option<CacheService>,
}

impl EventService {
    pub fn new(events: Arc<dyn EventRepository>, cache: Option<CacheService>) -> Self {
        Self { events, cache }
    }

    pub async fn first_event(&self) -> AppResult<Event> {
        if let Some(cache) = &self.cache {
            if let Some(event) = cache.get_event().await {
                return Ok(event);
            }
        }

        let event = self.events.find_first().await?.ok_or(AppError::NotFound)?;

        if let Some(cache) = &self.cache {
            cache.save_event(&event).await;
        }
        Ok(event)
    }
}
