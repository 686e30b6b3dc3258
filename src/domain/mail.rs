//! Mail relay value types.
//!
//! A relay request carries the full SMTP credentials with every call; nothing
//! here is persisted or cached across requests.

use serde::{Deserialize, Serialize};

use crate::domain::types::{EmailAddress, HostName};

/// Connection parameters for the caller-chosen SMTP server.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SmtpConfig {
    pub host: HostName,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: EmailAddress,
    pub from_name: String,
}

impl SmtpConfig {
    /// Whether the connection uses implicit TLS rather than STARTTLS.
    /// Inferred solely from the conventional SMTPS port.
    pub fn implicit_tls(&self) -> bool {
        self.port == 465
    }
}

/// Decoded attachment ready to be placed on the wire.
#[derive(Clone, Debug, PartialEq)]
pub struct MailAttachment {
    pub filename: String,
    pub content: Vec<u8>,
    pub content_type: String,
}

/// Message payload forwarded verbatim to the SMTP server.
#[derive(Clone, Debug, PartialEq)]
pub struct MailMessage {
    /// Comma-separated recipient list, passed through as provided.
    pub to: String,
    pub subject: String,
    /// HTML body, not sanitized by the relay.
    pub html_body: String,
    pub reply_to: Option<String>,
    pub attachments: Vec<MailAttachment>,
}

/// Validated relay request: where to connect and what to send.
#[derive(Clone, Debug, PartialEq)]
pub struct MailSendRequest {
    pub smtp: SmtpConfig,
    pub message: MailMessage,
}

/// Confirmation of a delivered message.
#[derive(Clone, Debug, PartialEq)]
pub struct SentEmail {
    /// Relay-assigned `Message-ID`, opaque to callers.
    pub message_id: String,
}
