use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{AddressParams, EnrollmentParams, EnrollmentWithAddress};
use crate::repositories::{AddressRepository, EnrollmentRepository};
use crate::services::address_lookup::{normalize_cep, PostalAddress, PostalCodeLookup};

#[derive(Clone)]
pub struct EnrollmentService {
    enrollments: Arc<dyn EnrollmentRepository>,
    addresses: Arc<dyn AddressRepository>,
    postal: Arc<dyn PostalCodeLookup>,
}

impl EnrollmentService {
    pub fn new(
        enrollments: Arc<dyn EnrollmentRepository>,
        addresses: Arc<dyn AddressRepository>,
        postal: Arc<dyn PostalCodeLookup>,
    ) -> Self {
        Self { enrollments, addresses, postal }
    }

    pub async fn postal_address(&self, cep: &str) -> AppResult<PostalAddress> {
        let cep = normalize_cep(cep).ok_or_else(|| AppError::invalid_data("cep"))?;

        match self.postal.lookup(&cep).await {
            Ok(Some(address)) => Ok(address),
            Ok(None) => Err(AppError::invalid_data("cep")),
            Err(e) => {
                warn!("CEP {} could not be resolved: {}", cep, e);
                Err(AppError::Upstream(e.to_string()))
            }
        }
    }

    pub async fn enrollment_with_address(&self, user_id: i32) -> AppResult<EnrollmentWithAddress> {
        self.enrollments
            .find_with_address_by_user_id(user_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Creates or replaces the caller's enrollment and its address. The CEP must
    /// resolve before anything is written.
    pub async fn upsert_enrollment(
        &self,
        user_id: i32,
        enrollment: EnrollmentParams,
        address: AddressParams,
    ) -> AppResult<EnrollmentWithAddress> {
        self.postal_address(&address.cep).await?;

        let enrollment = self.enrollments.upsert(user_id, &enrollment).await?;
        let address = self.addresses.upsert(enrollment.id, &address).await?;
        info!("Saved enrollment {} for user {}", enrollment.id, user_id);

        Ok(EnrollmentWithAddress::new(enrollment, Some(address)))
    }
}
