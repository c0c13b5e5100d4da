//! Card payments for tickets. No gateway is involved: paying records the issuer
//! and last four digits and flips the ticket to `PAID` in one transaction.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{NewPayment, Payment, TicketStatus, TicketWithType};
use crate::repositories::{EnrollmentRepository, PaymentRepository, TicketRepository};

/// Card fields the service needs. Name, expiration date and CVV are validated
/// at the edge and dropped there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardPayment {
    pub issuer: String,
    pub number: String,
}

impl CardPayment {
    pub fn last_digits(&self) -> String {
        let digits: Vec<char> = self.number.chars().filter(char::is_ascii_digit).collect();
        digits[digits.len().saturating_sub(4)..].iter().collect()
    }
}

#[derive(Clone)]
pub struct PaymentService {
    enrollments: Arc<dyn EnrollmentRepository>,
    tickets: Arc<dyn TicketRepository>,
    payments: Arc<dyn PaymentRepository>,
}

impl PaymentService {
    pub fn new(
        enrollments: Arc<dyn EnrollmentRepository>,
        tickets: Arc<dyn TicketRepository>,
        payments: Arc<dyn PaymentRepository>,
    ) -> Self {
        Self { enrollments, tickets, payments }
    }

    pub async fn process_payment(&self, user_id: i32, ticket_id: i32, card: CardPayment) -> AppResult<Payment> {
        let ticket = self.owned_ticket(user_id, ticket_id).await?;

        if ticket.ticket.status == TicketStatus::Paid {
            return Err(AppError::Conflict("Ticket is already paid".to_string()));
        }

        let payment = NewPayment {
            ticket_id,
            value: ticket.ticket_type.price,
            card_last_digits: card.last_digits(),
            card_issuer: card.issuer,
        };

        let payment = self.payments.create_and_mark_paid(&payment).await?;
        info!(
            "Ticket {} paid by user {} (value {}, issuer {})",
            ticket_id, user_id, payment.value, payment.card_issuer
        );
        Ok(payment)
    }

    pub async fn payment_for_ticket(&self, user_id: i32, ticket_id: i32) -> AppResult<Payment> {
        self.owned_ticket(user_id, ticket_id).await?;

        self.payments
            .find_by_ticket_id(ticket_id)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    async fn owned_ticket(&self, user_id: i32, ticket_id: i32) -> AppResult<TicketWithType> {
        let ticket = self
            .tickets
            .find_by_id(ticket_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let enrollment_id = self.enrollments.find_id_by_user_id(user_id).await?;
        if enrollment_id != Some(ticket.ticket.enrollment_id) {
            warn!("User {} tried to access ticket {} of another enrollment", user_id, ticket_id);
            return Err(AppError::Unauthorized);
        }

        Ok(ticket)
    }
}
