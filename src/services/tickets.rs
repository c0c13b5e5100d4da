use std::sync::Arc;

use tracing::info;

use crate::cache::CacheService;
use crate::error::{AppError, AppResult};
use crate::models::{TicketType, TicketWithType};
use crate::repositories::{EnrollmentRepository, TicketRepository};

#[derive(Clone)]
pub struct TicketService {
    enrollments: Arc<dyn EnrollmentRepository>,
    tickets: Arc<dyn TicketRepository>,
    cache: Option<CacheService>,
}

impl TicketService {
    pub fn new(
        enrollments: Arc<dyn EnrollmentRepository>,
        tickets: Arc<dyn TicketRepository>,
        cache: Option<CacheService>,
    ) -> Self {
        Self { enrollments, tickets, cache }
    }

    pub async fn ticket_types(&self) -> AppResult<Vec<TicketType>> {
        if let Some(cache) = &self.cache {
            if let Some(types) = cache.get_ticket_types().await {
                return Ok(types);
            }
        }

        let types = self.tickets.find_types().await?;

        if let Some(cache) = &self.cache {
            cache.save_ticket_types(&types).await;
        }
        Ok(types)
    }

    pub async fn create_ticket(&self, user_id: i32, ticket_type_id: i32) -> AppResult<TicketWithType> {
        let enrollment_id = self
            .enrollments
            .find_id_by_user_id(user_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if self.tickets.find_type_by_id(ticket_type_id).await?.is_none() {
            return Err(AppError::NotFound);
        }

        if self.tickets.find_by_enrollment_id(enrollment_id).await?.is_some() {
            return Err(AppError::Conflict("Enrollment already has a ticket".to_string()));
        }

        let ticket = self.tickets.create(enrollment_id, ticket_type_id).await?;
        info!(
            "Reserved ticket {} (type {}) for enrollment {}",
            ticket.ticket.id, ticket_type_id, enrollment_id
        );
        Ok(ticket)
    }

    pub async fn user_ticket(&self, user_id: i32) -> AppResult<TicketWithType> {
        let enrollment_id = self
            .enrollments
            .find_id_by_user_id(user_id)
            .await?
            .ok_or(AppError::NotFound)?;

        self.tickets
            .find_by_enrollment_id(enrollment_id)
            .await?
            .ok_or(AppError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TicketStatus;
    use crate::repositories::memory::MemoryStore;

    fn service(store: &Arc<MemoryStore>) -> TicketService {
        let repos = store.repositories();
        TicketService::new(repos.enrollments, repos.tickets, None)
    }

    #[tokio::test]
    async fn lists_all_ticket_types() {
        let store = MemoryStore::new();
        store.insert_ticket_type(true, false, 100);
        store.insert_ticket_type(false, true, 600);

        let types = service(&store).ticket_types().await.unwrap();
        assert_eq!(types.len(), 2);
    }

    #[tokio::test]
    async fn creates_a_reserved_ticket() {
        let store = MemoryStore::new();
        let user = store.insert_user("ana@example.com", "hash");
        store.insert_enrollment(user.id, "Ana");
        let ticket_type = store.insert_ticket_type(false, true, 600);
        let svc = service(&store);

        let created = svc.create_ticket(user.id, ticket_type.id).await.unwrap();
        assert_eq!(created.ticket.status, TicketStatus::Reserved);
        assert_eq!(created.ticket_type.id, ticket_type.id);

        let fetched = svc.user_ticket(user.id).await.unwrap();
        assert_eq!(fetched.ticket.id, created.ticket.id);
    }

    #[tokio::test]
    async fn requires_enrollment_and_known_type() {
        let store = MemoryStore::new();
        let user = store.insert_user("ana@example.com", "hash");
        let ticket_type = store.insert_ticket_type(false, true, 600);
        let svc = service(&store);

        assert!(matches!(svc.create_ticket(user.id, ticket_type.id).await, Err(AppError::NotFound)));
        assert!(matches!(svc.user_ticket(user.id).await, Err(AppError::NotFound)));

        store.insert_enrollment(user.id, "Ana");
        assert!(matches!(svc.create_ticket(user.id, 9999).await, Err(AppError::NotFound)));
        assert!(matches!(svc.user_ticket(user.id).await, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn second_ticket_conflicts() {
        let store = MemoryStore::new();
        let user = store.insert_user("ana@example.com", "hash");
        store.insert_enrollment(user.id, "Ana");
        let ticket_type = store.insert_ticket_type(true, false, 100);
        let svc = service(&store);

        svc.create_ticket(user.id, ticket_type.id).await.unwrap();
        let err = svc.create_ticket(user.id, ticket_type.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
