//! Bearer-secret request authentication.
//!
//! The relay is gated by a single shared secret; there is no per-caller
//! identity. `RelayAuth` is an extractor so handlers declare the requirement
//! in their signature and rejected requests never reach the handler body.

use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, web};

use crate::models::config::ServerConfig;
use crate::services::ServiceError;

/// Proof that the request carried the configured relay secret.
#[derive(Clone, Copy, Debug)]
pub struct RelayAuth;

impl FromRequest for RelayAuth {
    type Error = ServiceError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authorize(req))
    }
}

fn authorize(req: &HttpRequest) -> Result<RelayAuth, ServiceError> {
    let secret = req
        .app_data::<web::Data<ServerConfig>>()
        .map(|config| config.relay_secret.clone())
        .ok_or(ServiceError::AuthMismatch)?;

    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or(ServiceError::AuthMissing)?;

    let token = header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(ServiceError::AuthMalformed)?;

    if token == secret {
        Ok(RelayAuth)
    } else {
        Err(ServiceError::AuthMismatch)
    }
}
