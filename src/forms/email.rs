//! Request body of `POST /api/send-email`.
//!
//! The wire contract is camelCase; conversion into domain types performs the
//! presence checks, SMTP-config validation and attachment decoding, so a
//! request that reaches the service layer is structurally sound.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use validator::Validate;

use crate::domain::mail::{MailAttachment, MailMessage, MailSendRequest, SmtpConfig};
use crate::domain::types::{EmailAddress, HostName};
use crate::services::ServiceError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Top-level send request. Required fields stay `Option` so their absence
/// is reported through the error envelope instead of a deserializer error.
pub struct SendEmailForm {
    pub smtp_config: Option<SmtpConfigForm>,
    pub to: Option<String>,
    pub subject: Option<String>,
    /// HTML body, relayed verbatim.
    pub body: Option<String>,
    pub reply_to: Option<String>,
    #[serde(default)]
    pub attachments: Vec<AttachmentForm>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
/// Credentials for the caller-chosen SMTP server, supplied per request.
pub struct SmtpConfigForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "host is required"))]
    pub host: String,
    #[validate(range(min = 1, message = "port must be between 1 and 65535"))]
    pub port: Option<u16>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    #[validate(email(message = "from must be a valid email address"))]
    pub from: String,
    #[serde(default)]
    pub from_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Attachment payload with base64-encoded content.
pub struct AttachmentForm {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub content: String,
    pub content_type: Option<String>,
}

impl SendEmailForm {
    /// Names of the required fields the request left out or empty.
    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.smtp_config.is_none() {
            missing.push("smtpConfig");
        }
        if self.to.as_deref().is_none_or(str::is_empty) {
            missing.push("to");
        }
        if self.subject.as_deref().is_none_or(str::is_empty) {
            missing.push("subject");
        }
        if self.body.as_deref().is_none_or(str::is_empty) {
            missing.push("body");
        }
        missing
    }
}

impl TryFrom<SendEmailForm> for MailSendRequest {
    type Error = ServiceError;

    fn try_from(form: SendEmailForm) -> Result<Self, Self::Error> {
        let missing = form.missing_fields();
        if !missing.is_empty() {
            return Err(ServiceError::MissingFields(missing.join(", ")));
        }

        let (Some(smtp_config), Some(to), Some(subject), Some(body)) =
            (form.smtp_config, form.to, form.subject, form.body)
        else {
            return Err(ServiceError::MissingFields(
                "smtpConfig, to, subject, body".to_string(),
            ));
        };

        let smtp = SmtpConfig::try_from(smtp_config)?;
        let attachments = form
            .attachments
            .into_iter()
            .map(MailAttachment::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(MailSendRequest {
            smtp,
            message: MailMessage {
                to,
                subject,
                html_body: body,
                reply_to: form.reply_to.filter(|s| !s.is_empty()),
                attachments,
            },
        })
    }
}

impl TryFrom<SmtpConfigForm> for SmtpConfig {
    type Error = ServiceError;

    fn try_from(form: SmtpConfigForm) -> Result<Self, Self::Error> {
        form.validate()
            .map_err(|e| ServiceError::InvalidSmtpConfig(e.to_string()))?;

        let port = form
            .port
            .ok_or_else(|| ServiceError::InvalidSmtpConfig("port is required".to_string()))?;
        let host = HostName::new(form.host)
            .map_err(|e| ServiceError::InvalidSmtpConfig(format!("host: {e}")))?;
        let from = EmailAddress::new(form.from)
            .map_err(|e| ServiceError::InvalidSmtpConfig(format!("from: {e}")))?;

        Ok(SmtpConfig {
            host,
            port,
            username: form.username,
            password: form.password,
            from,
            from_name: form.from_name,
        })
    }
}

impl TryFrom<AttachmentForm> for MailAttachment {
    type Error = ServiceError;

    fn try_from(form: AttachmentForm) -> Result<Self, Self::Error> {
        let content = BASE64.decode(form.content.as_bytes()).map_err(|e| {
            ServiceError::InvalidAttachment(format!("{}: {e}", form.filename))
        })?;

        Ok(MailAttachment {
            filename: form.filename,
            content,
            content_type: form
                .content_type
                .unwrap_or_else(|| "application/octet-stream".to_string()),
        })
    }
}
