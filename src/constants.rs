use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

pub const SUCCESS_MESSAGE: &str = "Message sent successfully! I will get back to you soon.";

pub const DEFAULT_EMAIL_SUBJECT: &str = "New Message from Contact Form";
pub const EMAIL_SUBJECT_PREFIX: &str = "Contact Form:";

/// Matches the body size most form backends accept by default (100 KiB).
pub const JSON_BODY_LIMIT: usize = 100 * 1024;

/// Key used when neither a forwarded header nor a peer address is available.
pub const UNKNOWN_CLIENT: &str = "unknown";
