use config::{ConfigError, Environment};
use serde::Deserialize;

// Top-level settings, grouped by concern
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub auth: AuthConfig,
    pub postal: PostalConfig,
    pub circuit_breaker: CircuitBreakerConfig,
    pub features: FeatureFlags,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
    pub acquire_timeout_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: Option<String>,
    pub ttl_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expires_in_hours: i64,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub bcrypt_cost: u32,
}

// External CEP lookup (ViaCEP compatible)
#[derive(Debug, Clone)]
pub struct PostalConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    pub failure_threshold: u32,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone)]
pub struct FeatureFlags {
    pub enable_cache: bool,
}

/// Flat view of the process environment. Keys are the lowercased variable names.
#[derive(Debug, Deserialize)]
struct EnvVars {
    host: String,
    port: u16,
    environment: String,
    rust_log: String,
    log_format: LogFormat,
    database_url: String,
    db_pool_size: u32,
    db_acquire_timeout_seconds: u64,
    redis_url: Option<String>,
    redis_ttl_seconds: u64,
    jwt_secret: String,
    jwt_expires_in_hours: i64,
    bcrypt_cost: u32,
    via_cep_api: String,
    via_cep_timeout_seconds: u64,
    circuit_breaker_failure_threshold: u32,
    circuit_breaker_timeout_seconds: u64,
    enable_cache: bool,
}

impl Config {
    /// Reads the environment (after `.env` has been loaded by the caller).
    /// `DATABASE_URL` and `JWT_SECRET` are required, everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let vars: EnvVars = config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 4000)?
            .set_default("environment", "development")?
            .set_default("rust_log", "event_registration=debug,tower_http=debug")?
            .set_default("log_format", "pretty")?
            .set_default("db_pool_size", 20)?
            .set_default("db_acquire_timeout_seconds", 5)?
            .set_default("redis_ttl_seconds", 3600)?
            .set_default("jwt_expires_in_hours", 24)?
            .set_default("bcrypt_cost", 10)?
            .set_default("via_cep_api", "https://viacep.com.br/ws")?
            .set_default("via_cep_timeout_seconds", 10)?
            .set_default("circuit_breaker_failure_threshold", 5)?
            .set_default("circuit_breaker_timeout_seconds", 60)?
            .set_default("enable_cache", true)?
            .add_source(Environment::default().try_parsing(true))
            .build()?
            .try_deserialize()?;

        Ok(vars.into())
    }
}

impl From<EnvVars> for Config {
    fn from(vars: EnvVars) -> Self {
        Config {
            app: AppConfig {
                host: vars.host,
                port: vars.port,
                environment: vars.environment,
                rust_log: vars.rust_log,
                log_format: vars.log_format,
            },
            database: DatabaseConfig {
                url: vars.database_url,
                pool_size: vars.db_pool_size,
                acquire_timeout_seconds: vars.db_acquire_timeout_seconds,
            },
            redis: RedisConfig {
                url: vars.redis_url.filter(|url| !url.is_empty()),
                ttl_seconds: vars.redis_ttl_seconds,
            },
            jwt: JwtConfig {
                secret: vars.jwt_secret,
                expires_in_hours: vars.jwt_expires_in_hours,
            },
            auth: AuthConfig {
                bcrypt_cost: vars.bcrypt_cost,
            },
            postal: PostalConfig {
                base_url: vars.via_cep_api.trim_end_matches('/').to_string(),
                timeout_seconds: vars.via_cep_timeout_seconds,
            },
            circuit_breaker: CircuitBreakerConfig {
                failure_threshold: vars.circuit_breaker_failure_threshold,
                timeout_seconds: vars.circuit_breaker_timeout_seconds,
            },
            features: FeatureFlags {
                enable_cache: vars.enable_cache,
            },
        }
    }
}
