use tracing::info;

use crate::cache::CacheService;
use crate::models::{Event, Hotel, TicketType};

const EVENT_KEY: &str = "catalog:event";
const TICKET_TYPES_KEY: &str = "catalog:ticket_types";
const HOTELS_KEY: &str = "catalog:hotels";

impl CacheService {
    pub async fn get_event(&self) -> Option<Event> {
        self.get_json(EVENT_KEY).await
    }

    pub async fn save_event(&self, event: &Event) {
        self.set_json(EVENT_KEY, event, self.ttl_seconds()).await;
    }

    pub async fn get_ticket_types(&self) -> Option<Vec<TicketType>> {
        self.get_json(TICKET_TYPES_KEY).await
    }

    pub async fn save_ticket_types(&self, types: &[TicketType]) {
        self.set_json(TICKET_TYPES_KEY, types, self.ttl_seconds()).await;
    }

    pub async fn get_hotels(&self) -> Option<Vec<Hotel>> {
        self.get_json(HOTELS_KEY).await
    }

    pub async fn save_hotels(&self, hotels: &[Hotel]) {
        self.set_json(HOTELS_KEY, hotels, self.ttl_seconds()).await;
    }

    pub async fn invalidate_catalog(&self) {
        for key in [EVENT_KEY, TICKET_TYPES_KEY, HOTELS_KEY] {
            self.invalidate(key).await;
        }
        info!("Invalidated catalog cache");
    }
}
