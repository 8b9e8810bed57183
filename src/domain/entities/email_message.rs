use serde::{Deserialize, Serialize};

/// Outbound email, serialized in the shape the Resend `/emails` endpoint expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailPayload {
    pub from: String,
    pub to: Vec<String>,
    pub reply_to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Provider acknowledgement for an accepted message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SentEmail {
    pub id: String,
}
