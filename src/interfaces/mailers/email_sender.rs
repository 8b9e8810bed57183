use async_trait::async_trait;

use crate::{
    entities::email_message::{EmailPayload, SentEmail},
    errors::EmailError,
    mailers::resend::ResendMailer,
};

/// Delivery seam for outbound email.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Whether the provider credential is present.
    fn is_configured(&self) -> bool;

    async fn send(&self, email: &EmailPayload) -> Result<SentEmail, EmailError>;
}

#[async_trait]
impl EmailSender for ResendMailer {
    fn is_configured(&self) -> bool {
        self.has_api_key()
    }

    async fn send(&self, email: &EmailPayload) -> Result<SentEmail, EmailError> {
        let api_key = self.api_key().ok_or(EmailError::MissingApiKey)?;

        let response = self.client
            .post(self.emails_url())
            .bearer_auth(api_key)
            .json(email)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmailError::Provider {
                status: status.as_u16(),
                message: provider_error_message(&body),
            });
        }

        Ok(response.json::<SentEmail>().await?)
    }
}

/// Resend reports failures as `{"statusCode", "name", "message"}`; fall back to the raw body.
fn provider_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                "empty response body".to_string()
            } else {
                body.trim().to_string()
            }
        })
}
