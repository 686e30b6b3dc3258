//! Service layer: request-level error taxonomy and the relay operations.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::dto::email::ApiError;
use crate::mailer::MailerError;

pub mod email;

/// Everything that can terminate a relay request.
///
/// Each variant maps to exactly one HTTP status so handlers and the
/// [`crate::models::auth::RelayAuth`] extractor render failures uniformly.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Missing authorization header")]
    AuthMissing,

    #[error("Invalid authorization format, expected: Bearer <secret>")]
    AuthMalformed,

    #[error("Invalid relay secret")]
    AuthMismatch,

    #[error("Missing required fields: {0}")]
    MissingFields(String),

    #[error("Invalid SMTP configuration: {0}")]
    InvalidSmtpConfig(String),

    #[error("Invalid attachment: {0}")]
    InvalidAttachment(String),

    #[error("SMTP connection failed: {0}")]
    SmtpVerifyFailed(String),

    /// Message passed verbatim from the mail library.
    #[error("{0}")]
    SmtpSendFailed(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<MailerError> for ServiceError {
    fn from(err: MailerError) -> Self {
        match err {
            MailerError::Verify(reason) => ServiceError::SmtpVerifyFailed(reason),
            other => ServiceError::SmtpSendFailed(other.to_string()),
        }
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::AuthMissing
            | ServiceError::AuthMalformed
            | ServiceError::AuthMismatch => StatusCode::UNAUTHORIZED,
            ServiceError::MissingFields(_)
            | ServiceError::InvalidSmtpConfig(_)
            | ServiceError::InvalidAttachment(_) => StatusCode::BAD_REQUEST,
            ServiceError::SmtpVerifyFailed(_) | ServiceError::SmtpSendFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ApiError::new(self.to_string()))
    }
}
