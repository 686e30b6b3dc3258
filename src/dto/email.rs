//! Response envelopes exposed by the relay endpoints.

use chrono::Utc;
use serde::Serialize;

/// Body returned when a message was handed off to the SMTP server.
#[derive(Debug, Serialize)]
pub struct SendEmailResponse {
    pub success: bool,
    #[serde(rename = "messageId")]
    pub message_id: String,
    pub message: String,
}

impl SendEmailResponse {
    /// Success envelope for a delivered message.
    pub fn sent(message_id: String) -> Self {
        Self {
            success: true,
            message_id,
            message: "Email sent successfully".to_string(),
        }
    }
}

/// Error envelope shared by every failing response.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub success: bool,
    pub error: String,
}

impl ApiError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Body returned by the liveness endpoint.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub timestamp: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok",
            service: "smtp-relay-worker",
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}
