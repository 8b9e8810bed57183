mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod background_task;
pub mod startup;

pub use domain::{email, entities, use_cases};
pub use interfaces::{handlers, mailers, middlewares, routes};
pub use infrastructure::{limiter, utils, web};

use std::sync::Arc;

use limiter::rate_limiter::FixedWindowLimiterStore;
use mailers::{email_sender::EmailSender, resend::ResendMailer};
use use_cases::contact::{ContactHandler, MailSettings};

pub struct AppState {
    pub contact_handler: ContactHandler,
    pub rate_limiter: FixedWindowLimiterStore,
    pub trust_forwarded_for: bool,
}

impl AppState {
    pub fn new(config: &settings::AppConfig) -> Self {
        let mailer = ResendMailer::from_config(config);
        if !mailer.has_api_key() {
            tracing::warn!("RESEND_API_KEY is not set; contact submissions will fail until it is configured");
        }

        Self::with_mailer(config, Arc::new(mailer))
    }

    /// Builds the state around any email sender.
    pub fn with_mailer(config: &settings::AppConfig, mailer: Arc<dyn EmailSender>) -> Self {
        let contact_handler = ContactHandler::new(
            mailer,
            MailSettings::from(config),
            config.expose_error_details(),
        );

        let rate_limiter = FixedWindowLimiterStore::new(
            config.rate_limit_max_requests,
            config.rate_limit_window,
            config.rate_limit_max_clients,
        );

        AppState {
            contact_handler,
            rate_limiter,
            trust_forwarded_for: config.trust_forwarded_for,
        }
    }
}
