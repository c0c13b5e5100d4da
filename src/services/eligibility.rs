use std::fmt;
use std::sync::Arc;

use crate::error::AppResult;
use crate::models::{TicketStatus, TicketType};
use crate::repositories::{EnrollmentRepository, TicketRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    NoEnrollment,
    NoTicket,
    TicketNotUsable,
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            DenialReason::NoEnrollment => "User does not have an enrollment",
            DenialReason::NoTicket => "User does not have a ticket",
            DenialReason::TicketNotUsable => "User ticket type does not allow booking",
        };
        f.write_str(message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eligibility {
    Eligible,
    Denied(DenialReason),
}

/// A ticket grants hotel access only once paid, in person, with hotel included.
pub fn ticket_allows_hotel(status: TicketStatus, ticket_type: &TicketType) -> bool {
    status == TicketStatus::Paid && !ticket_type.is_remote && ticket_type.includes_hotel
}

/// Read-only check of the enrollment -> ticket -> ticket type chain.
#[derive(Clone)]
pub struct EligibilityChecker {
    enrollments: Arc<dyn EnrollmentRepository>,
    tickets: Arc<dyn TicketRepository>,
}

impl EligibilityChecker {
    pub fn new(enrollments: Arc<dyn EnrollmentRepository>, tickets: Arc<dyn TicketRepository>) -> Self {
        Self { enrollments, tickets }
    }

    pub async fn check(&self, user_id: i32) -> AppResult<Eligibility> {
        let Some(enrollment_id) = self.enrollments.find_id_by_user_id(user_id).await? else {
            return Ok(Eligibility::Denied(DenialReason::NoEnrollment));
        };

        let Some(ticket) = self.tickets.find_by_enrollment_id(enrollment_id).await? else {
            return Ok(Eligibility::Denied(DenialReason::NoTicket));
        };

        if !ticket_allows_hotel(ticket.ticket.status, &ticket.ticket_type) {
            return Ok(Eligibility::Denied(DenialReason::TicketNotUsable));
        }

        Ok(Eligibility::Eligible)
    }
}
