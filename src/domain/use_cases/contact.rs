use chrono::Utc;
use std::sync::Arc;

use crate::{
    constants::{DEFAULT_EMAIL_SUBJECT, EMAIL_SUBJECT_PREFIX, SUCCESS_MESSAGE},
    entities::{
        contact::{ContactForm, ContactResponse, ContactSubmission},
        email_message::EmailPayload,
    },
    errors::ContactError,
    mailers::email_sender::EmailSender,
    settings::AppConfig,
    utils::email_template::render_contact_email,
};

/// Addressing shared by every notification email.
#[derive(Debug, Clone)]
pub struct MailSettings {
    pub from: String,
    pub to: String,
    pub source_label: String,
}

impl From<&AppConfig> for MailSettings {
    fn from(config: &AppConfig) -> Self {
        MailSettings {
            from: config.from_email.clone(),
            to: config.contact_recipient.clone(),
            source_label: config.source_label.clone(),
        }
    }
}

pub struct ContactHandler {
    pub mailer: Arc<dyn EmailSender>,
    pub mail_settings: MailSettings,
    pub expose_error_details: bool,
}

impl ContactHandler {
    pub fn new(
        mailer: Arc<dyn EmailSender>,
        mail_settings: MailSettings,
        expose_error_details: bool,
    ) -> Self {
        ContactHandler {
            mailer,
            mail_settings,
            expose_error_details,
        }
    }

    /// Validates a submission and relays it as one email.
    ///
    /// Stages run in a fixed order and the first failure ends the request:
    /// validation, credential check, delivery.
    pub async fn submit(&self, form: ContactForm) -> Result<ContactResponse, ContactError> {
        let submission = form.into_submission()?;

        if !self.mailer.is_configured() {
            tracing::error!("Email provider API key is not configured");
            return Err(ContactError::ConfigurationMissing);
        }

        let payload = self.build_payload(&submission);

        match self.mailer.send(&payload).await {
            Ok(sent) => {
                tracing::info!(email_id = %sent.id, "Email sent successfully");
                Ok(ContactResponse {
                    success: true,
                    message: SUCCESS_MESSAGE.to_string(),
                })
            }
            Err(e) => {
                tracing::error!("Error sending email: {}", e);
                Err(ContactError::DeliveryFailed {
                    detail: self.expose_error_details.then(|| e.to_string()),
                })
            }
        }
    }

    pub fn build_payload(&self, submission: &ContactSubmission) -> EmailPayload {
        let rendered = render_contact_email(
            submission,
            &self.mail_settings.source_label,
            Utc::now(),
        );

        let subject = match submission.subject.as_deref() {
            Some(subject) => format!("{} {}", EMAIL_SUBJECT_PREFIX, subject),
            None => DEFAULT_EMAIL_SUBJECT.to_string(),
        };

        EmailPayload {
            from: self.mail_settings.from.clone(),
            to: vec![self.mail_settings.to.clone()],
            reply_to: submission.email.clone(),
            subject,
            html: rendered.html,
            text: rendered.text,
        }
    }
}
