use actix_web::{HttpResponse, Responder, ResponseError, post, web};

use crate::dto::email::SendEmailResponse;
use crate::forms::email::SendEmailForm;
use crate::mailer::LettreMailer;
use crate::models::auth::RelayAuth;
use crate::services;

#[post("/send-email")]
pub async fn send_email(
    _auth: RelayAuth,
    mailer: web::Data<LettreMailer>,
    web::Json(form): web::Json<SendEmailForm>,
) -> impl Responder {
    match services::email::send_email(mailer.get_ref(), form).await {
        Ok(sent) => HttpResponse::Ok().json(SendEmailResponse::sent(sent.message_id)),
        Err(e) => {
            log::error!("Failed to relay email: {e}");
            e.error_response()
        }
    }
}
