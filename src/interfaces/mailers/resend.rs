use reqwest::Client;
use std::fmt;
use zeroize::Zeroizing;

use crate::settings::AppConfig;

/// HTTP client for the Resend transactional email API.
///
/// No timeout or retry is configured; the transport defaults apply.
#[derive(Clone)]
pub struct ResendMailer {
    pub(crate) client: Client,
    api_key: Option<Zeroizing<String>>,
    base_url: String,
}

impl ResendMailer {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .map(Zeroizing::new);

        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.resend_api_key.clone(), config.resend_base_url.as_str())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub(crate) fn api_key(&self) -> Option<&str> {
        self.api_key.as_ref().map(|key| key.as_str())
    }

    pub(crate) fn emails_url(&self) -> String {
        format!("{}/emails", self.base_url)
    }
}

impl fmt::Debug for ResendMailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResendMailer")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .finish()
    }
}
