use actix_web::{HttpResponse, Responder, get};

use crate::dto::email::HealthResponse;

/// Liveness probe; answers regardless of authentication.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse::ok())
}
