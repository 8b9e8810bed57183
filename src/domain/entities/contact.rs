use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::{domain::email::normalize_email, errors::ContactError};

// ───── Input & Validation ───────────────────────────────────────────

/// Raw submission as posted by the contact form.
///
/// Missing, null or non-text fields decode leniently so they are reported
/// as validation errors instead of body decoding failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactForm {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,

    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,

    #[serde(default, deserialize_with = "lenient_optional_string")]
    pub subject: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub message: String,
}

/// Numbers and booleans become their text form; null, arrays and objects
/// become absent.
fn lenient_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;

    Ok(value.and_then(|v| match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_optional_string(deserializer)?.unwrap_or_default())
}

/// Trimmed view of a [`ContactForm`], the shape the rules are checked against.
#[derive(Debug, Validate)]
struct TrimmedContactForm {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    name: String,

    #[validate(email(message = "Please provide a valid email address"))]
    email: String,

    #[validate(length(max = 200, message = "Subject must not exceed 200 characters"))]
    subject: Option<String>,

    #[validate(length(min = 10, max = 5000, message = "Message must be between 10 and 5000 characters"))]
    message: String,
}

impl ContactForm {
    /// Checks every rule and returns the normalized submission, or all
    /// field errors at once.
    pub fn into_submission(self) -> Result<ContactSubmission, ContactError> {
        let trimmed = TrimmedContactForm {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            subject: self.subject.as_deref().map(|s| s.trim().to_string()),
            message: self.message.trim().to_string(),
        };

        trimmed.validate()?;

        Ok(ContactSubmission {
            email: normalize_email(&trimmed.email),
            name: trimmed.name,
            subject: trimmed.subject.filter(|s| !s.is_empty()),
            message: trimmed.message,
        })
    }
}

// ───── Validated Models ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}
