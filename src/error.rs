use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

pub type AppResult<T> = Result<T, AppError>;

/// Every failure a request can end with. Rendered as `{ name, message }`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid data: {}", .0.join(", "))]
    InvalidData(Vec<String>),
    #[error("Cannot enroll before event start date!")]
    CannotEnrollBeforeStartDate,
    #[error("You must be signed in to continue")]
    Unauthorized,
    #[error("email or password are incorrect")]
    InvalidCredentials,
    #[error("Payment required")]
    PaymentRequired,
    #[error("{0}")]
    Forbidden(String),
    #[error("No result for this search!")]
    NotFound,
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Upstream(String),
    #[error("database error: {0}")]
    Database(sqlx::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    name: &'static str,
    message: String,
}

impl AppError {
    pub fn invalid_data(field: &str) -> Self {
        AppError::InvalidData(vec![field.to_string()])
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        AppError::Forbidden(reason.into())
    }

    pub fn name(&self) -> &'static str {
        match self {
            AppError::InvalidData(_) => "InvalidDataError",
            AppError::CannotEnrollBeforeStartDate => "CannotEnrollBeforeStartDateError",
            AppError::Unauthorized => "UnauthorizedError",
            AppError::InvalidCredentials => "InvalidCredentialsError",
            AppError::PaymentRequired => "PaymentRequiredError",
            AppError::Forbidden(_) => "ForbiddenError",
            AppError::NotFound => "NotFoundError",
            AppError::Conflict(_) => "ConflictError",
            AppError::Upstream(_) => "UpstreamError",
            AppError::Database(_) | AppError::Internal(_) => "InternalServerError",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidData(_) | AppError::CannotEnrollBeforeStartDate => StatusCode::BAD_REQUEST,
            AppError::Unauthorized | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::PaymentRequired => StatusCode::PAYMENT_REQUIRED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if db_err.is_unique_violation() {
                return AppError::Conflict("Resource already exists".to_string());
            }
        }
        AppError::Database(err)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors.errors().keys().map(|k| k.to_string()).collect();
        fields.sort();
        AppError::InvalidData(fields)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() && status != StatusCode::BAD_GATEWAY {
            tracing::error!("Internal Server Error: {:?}", self);
            "Internal Server Error".to_string()
        } else {
            if status == StatusCode::BAD_GATEWAY {
                tracing::warn!("Upstream failure: {}", self);
            }
            self.to_string()
        };

        let body = Json(ErrorBody { name: self.name(), message });
        (status, body).into_response()
    }
}
