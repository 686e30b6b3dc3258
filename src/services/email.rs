//! Relay send operation.

use crate::domain::mail::{MailSendRequest, SentEmail};
use crate::forms::email::SendEmailForm;
use crate::mailer::EmailSender;
use crate::services::{ServiceError, ServiceResult};

/// Validates the request and forwards it through the SMTP seam.
///
/// Validation failures never open a connection; transport failures carry
/// the mail library's message into the 500 taxonomy.
pub async fn send_email<M>(mailer: &M, form: SendEmailForm) -> ServiceResult<SentEmail>
where
    M: EmailSender,
{
    let request = MailSendRequest::try_from(form)?;
    mailer
        .deliver(&request.smtp, &request.message)
        .await
        .map_err(ServiceError::from)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::domain::mail::{MailMessage, SmtpConfig};
    use crate::mailer::MailerError;

    struct StubMailer {
        verify_failure: Option<String>,
        called: Cell<bool>,
    }

    impl StubMailer {
        fn ok() -> Self {
            Self {
                verify_failure: None,
                called: Cell::new(false),
            }
        }

        fn failing_verify(reason: &str) -> Self {
            Self {
                verify_failure: Some(reason.to_string()),
                called: Cell::new(false),
            }
        }
    }

    impl EmailSender for StubMailer {
        async fn deliver(
            &self,
            _smtp: &SmtpConfig,
            _mail: &MailMessage,
        ) -> Result<SentEmail, MailerError> {
            self.called.set(true);
            match &self.verify_failure {
                Some(reason) => Err(MailerError::Verify(reason.clone())),
                None => Ok(SentEmail {
                    message_id: "<stub@example.com>".to_string(),
                }),
            }
        }
    }

    fn valid_form() -> SendEmailForm {
        serde_json::from_value(serde_json::json!({
            "smtpConfig": {
                "host": "mail.example.com",
                "port": 587,
                "username": "crm",
                "password": "secret",
                "from": "offers@example.com",
                "fromName": "Offers"
            },
            "to": "client@example.com",
            "subject": "Offer",
            "body": "<p>Hello</p>"
        }))
        .expect("valid form json")
    }

    #[actix_web::test]
    async fn missing_fields_never_reach_the_transport() {
        let mailer = StubMailer::ok();
        let mut form = valid_form();
        form.to = None;

        let err = send_email(&mailer, form).await.unwrap_err();

        assert!(matches!(err, ServiceError::MissingFields(ref f) if f == "to"));
        assert!(!mailer.called.get());
    }

    #[actix_web::test]
    async fn invalid_smtp_config_never_reaches_the_transport() {
        let mailer = StubMailer::ok();
        let mut form = valid_form();
        if let Some(config) = form.smtp_config.as_mut() {
            config.port = Some(0);
        }

        let err = send_email(&mailer, form).await.unwrap_err();

        assert!(matches!(err, ServiceError::InvalidSmtpConfig(_)));
        assert!(!mailer.called.get());
    }

    #[actix_web::test]
    async fn verify_failure_maps_to_connection_error() {
        let mailer = StubMailer::failing_verify("connection refused");

        let err = send_email(&mailer, valid_form()).await.unwrap_err();

        assert_eq!(err.to_string(), "SMTP connection failed: connection refused");
        assert!(mailer.called.get());
    }

    #[actix_web::test]
    async fn successful_send_returns_the_message_id() {
        let mailer = StubMailer::ok();

        let sent = send_email(&mailer, valid_form()).await.expect("send failed");

        assert_eq!(sent.message_id, "<stub@example.com>");
    }
}
