//! Postal-code (CEP) lookup against a ViaCEP-compatible HTTP service.
//!
//! Every outbound call goes through a [`CircuitBreaker`], so a dead lookup
//! service turns into fast `LookupError::Open` failures instead of piling up
//! requests that each wait for the HTTP timeout.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use crate::config::{CircuitBreakerConfig, PostalConfig};

/// Circuit breaker states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Requests flow normally.
    Closed,
    /// Too many consecutive failures, requests are rejected until the timeout elapses.
    Open,
    /// Timeout elapsed, the next request is a trial call.
    HalfOpen,
}

#[derive(Debug)]
pub struct CircuitBreaker {
    state: RwLock<CircuitState>,
    failure_count: AtomicU32,
    opened_at: Mutex<Option<Instant>>,
    failure_threshold: u32,
    timeout_duration: Duration,
}

impl CircuitBreaker {
    pub fn new(failure_threshold: u32, timeout_seconds: u64) -> Self {
        Self {
            state: RwLock::new(CircuitState::Closed),
            failure_count: AtomicU32::new(0),
            opened_at: Mutex::new(None),
            failure_threshold: failure_threshold.max(1),
            timeout_duration: Duration::from_secs(timeout_seconds),
        }
    }

    pub fn from_config(config: &CircuitBreakerConfig) -> Self {
        Self::new(config.failure_threshold, config.timeout_seconds)
    }

    pub fn can_execute(&self) -> bool {
        match self.state() {
            CircuitState::Closed | CircuitState::HalfOpen => true,
            CircuitState::Open => {
                let opened_at = *self.opened_at.lock().unwrap_or_else(|e| e.into_inner());
                let elapsed = opened_at.map(|at| at.elapsed()).unwrap_or(self.timeout_duration);
                if elapsed >= self.timeout_duration {
                    *self.state.write().unwrap_or_else(|e| e.into_inner()) = CircuitState::HalfOpen;
                    info!("Circuit breaker transitioning to HalfOpen state");
                    true
                } else {
                    false
                }
            }
        }
    }

    pub fn record_success(&self) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        if *state == CircuitState::HalfOpen {
            info!("Circuit breaker recovered - transitioning to Closed state");
        }
        *state = CircuitState::Closed;
        self.failure_count.store(0, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        let failure_count = self.failure_count.fetch_add(1, Ordering::Relaxed) + 1;
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());

        let open = match *state {
            CircuitState::Closed if failure_count >= self.failure_threshold => {
                error!(
                    "Circuit breaker OPENED - {} failures reached threshold {}",
                    failure_count, self.failure_threshold
                );
                true
            }
            CircuitState::HalfOpen => {
                warn!("Circuit breaker trial call failed - returning to Open state");
                true
            }
            _ => false,
        };

        if open {
            *state = CircuitState::Open;
            *self.opened_at.lock().unwrap_or_else(|e| e.into_inner()) = Some(Instant::now());
        }
    }

    pub fn state(&self) -> CircuitState {
        *self.state.read().unwrap_or_else(|e| e.into_inner())
    }
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("postal code lookup temporarily unavailable")]
    Open,
    #[error("postal code lookup failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Address fields resolved from a CEP. Serialized with the lookup service's own keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalAddress {
    #[serde(rename = "logradouro")]
    pub street: String,
    #[serde(rename = "complemento")]
    pub complement: String,
    #[serde(rename = "bairro")]
    pub neighborhood: String,
    #[serde(rename = "cidade")]
    pub city: String,
    #[serde(rename = "uf")]
    pub state: String,
}

/// Resolves a normalized 8-digit CEP. `Ok(None)` means the service does not know it.
#[async_trait]
pub trait PostalCodeLookup: Send + Sync {
    async fn lookup(&self, cep: &str) -> Result<Option<PostalAddress>, LookupError>;
}

/// Strips the `-` separator and checks for exactly eight digits.
pub fn normalize_cep(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| *c != '-').collect();
    (digits.len() == 8 && digits.chars().all(|c| c.is_ascii_digit())).then_some(digits)
}

#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    // ViaCEP answers 200 with `"erro": true` (sometimes the string "true") for unknown CEPs
    erro: Option<serde_json::Value>,
    #[serde(default)]
    logradouro: String,
    #[serde(default)]
    complemento: String,
    #[serde(default)]
    bairro: String,
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
}

pub struct ViaCepClient {
    base_url: String,
    http_client: reqwest::Client,
    circuit_breaker: CircuitBreaker,
}

impl ViaCepClient {
    pub fn new(
        postal: &PostalConfig,
        breaker: &CircuitBreakerConfig,
    ) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(postal.timeout_seconds))
            .build()?;

        Ok(Self {
            base_url: postal.base_url.clone(),
            http_client,
            circuit_breaker: CircuitBreaker::from_config(breaker),
        })
    }

    pub fn circuit_state(&self) -> CircuitState {
        self.circuit_breaker.state()
    }

    async fn execute_with_circuit_breaker<F, T>(&self, operation: F) -> Result<T, LookupError>
    where
        F: std::future::Future<Output = Result<T, reqwest::Error>>,
    {
        if !self.circuit_breaker.can_execute() {
            warn!("Circuit breaker is OPEN - blocking postal code lookup");
            return Err(LookupError::Open);
        }

        match operation.await {
            Ok(result) => {
                self.circuit_breaker.record_success();
                Ok(result)
            }
            Err(e) => {
                error!("Postal code lookup failed: {:?}", e);
                self.circuit_breaker.record_failure();
                Err(LookupError::Http(e))
            }
        }
    }
}

#[async_trait]
impl PostalCodeLookup for ViaCepClient {
    async fn lookup(&self, cep: &str) -> Result<Option<PostalAddress>, LookupError> {
        let url = format!("{}/{}/json/", self.base_url, cep);
        debug!("Looking up CEP {} via {}", cep, url);

        let operation = async {
            self.http_client
                .get(&url)
                .send()
                .await?
                .error_for_status()?
                .json::<ViaCepResponse>()
                .await
        };

        let response = self.execute_with_circuit_breaker(operation).await?;
        if response.erro.is_some() {
            return Ok(None);
        }

        Ok(Some(PostalAddress {
            street: response.logradouro,
            complement: response.complemento,
            neighborhood: response.bairro,
            city: response.localidade,
            state: response.uf,
        }))
    }
}
