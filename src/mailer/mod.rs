//! Outbound SMTP delivery via the `lettre` async transport.
//!
//! Every delivery builds a fresh transport from the caller-supplied server
//! parameters; nothing is pooled or cached between requests. Certificate
//! validation is disabled so the relay can talk to arbitrary customer
//! servers with self-signed or mismatched certificates.

use std::time::Duration;

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Body, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::mail::{MailMessage, SentEmail, SmtpConfig};

/// Error type for SMTP delivery failures.
#[derive(Debug, Error)]
pub enum MailerError {
    /// The pre-flight handshake against the target server failed; the send
    /// itself was never attempted.
    #[error("{0}")]
    Verify(String),

    /// SMTP transport-level failure while sending (rejected sender,
    /// dropped connection, timeout).
    #[error("{0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// A sender, recipient or reply-to address could not be parsed.
    #[error("{0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("{0}")]
    Build(String),
}

/// Seam between the service layer and the actual SMTP transport.
#[allow(async_fn_in_trait)]
pub trait EmailSender {
    /// Verifies the connection to the configured server, then sends.
    async fn deliver(&self, smtp: &SmtpConfig, mail: &MailMessage)
    -> Result<SentEmail, MailerError>;
}

/// [`EmailSender`] backed by `lettre`'s Tokio SMTP transport.
#[derive(Clone, Debug)]
pub struct LettreMailer {
    timeout: Duration,
}

impl LettreMailer {
    /// Creates a mailer applying the given socket timeout to every
    /// outbound connection.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn transport(
        &self,
        smtp: &SmtpConfig,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailerError> {
        let tls_parameters = TlsParameters::builder(smtp.host.as_str().to_string())
            .dangerous_accept_invalid_certs(true)
            .build()?;
        let tls = if smtp.implicit_tls() {
            Tls::Wrapper(tls_parameters)
        } else {
            Tls::Opportunistic(tls_parameters)
        };

        Ok(
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(smtp.host.as_str())
                .port(smtp.port)
                .tls(tls)
                .credentials(Credentials::new(
                    smtp.username.clone(),
                    smtp.password.clone(),
                ))
                .timeout(Some(self.timeout))
                .build(),
        )
    }
}

impl EmailSender for LettreMailer {
    async fn deliver(
        &self,
        smtp: &SmtpConfig,
        mail: &MailMessage,
    ) -> Result<SentEmail, MailerError> {
        let transport = self
            .transport(smtp)
            .map_err(|e| MailerError::Verify(e.to_string()))?;

        // NOOP handshake gates the send so a dead server never produces a
        // partially-attempted delivery.
        match transport.test_connection().await {
            Ok(true) => {}
            Ok(false) => {
                return Err(MailerError::Verify(
                    "server did not accept the connection".to_string(),
                ));
            }
            Err(e) => return Err(MailerError::Verify(e.to_string())),
        }

        let (message, message_id) = build_message(smtp, mail)?;
        transport.send(message).await?;

        log::info!(
            "Relayed message {message_id} via {}:{}",
            smtp.host,
            smtp.port
        );
        Ok(SentEmail { message_id })
    }
}

/// Assembles the MIME message and its relay-assigned `Message-ID`.
pub fn build_message(
    smtp: &SmtpConfig,
    mail: &MailMessage,
) -> Result<(Message, String), MailerError> {
    let from_address: Address = smtp.from.as_str().parse()?;
    let from_name = smtp.from_name.trim();
    let from_name = (!from_name.is_empty()).then(|| from_name.to_string());

    let message_id = format!("<{}@{}>", Uuid::new_v4(), smtp.from.domain());

    let mut builder = Message::builder()
        .from(Mailbox::new(from_name, from_address))
        .subject(mail.subject.clone())
        .message_id(Some(message_id.clone()));

    for recipient in mail.to.split(',') {
        builder = builder.to(recipient.trim().parse::<Mailbox>()?);
    }

    if let Some(reply_to) = &mail.reply_to {
        builder = builder.reply_to(reply_to.trim().parse::<Mailbox>()?);
    }

    let mut parts = MultiPart::mixed().singlepart(SinglePart::html(mail.html_body.clone()));
    for attachment in &mail.attachments {
        let content_type = ContentType::parse(&attachment.content_type)
            .map_err(|e| MailerError::Build(e.to_string()))?;
        parts = parts.singlepart(
            Attachment::new(attachment.filename.clone())
                .body(Body::new(attachment.content.clone()), content_type),
        );
    }

    let message = builder
        .multipart(parts)
        .map_err(|e| MailerError::Build(e.to_string()))?;
    Ok((message, message_id))
}
