use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse
};
use derive_more::{Display, Error};
use serde::Serialize;
use validator::ValidationErrors;

/// Order in which field errors are reported back to the client.
const FIELD_ORDER: [&str; 4] = ["name", "email", "subject", "message"];

#[derive(Debug, Display)]
pub enum ContactError {
    #[display("Too many requests. Please try again later.")]
    RateLimitExceeded,

    #[display("validation error: {}", format_field_errors(_0))]
    ValidationFailed(Vec<FieldError>),

    #[display("Email service is not configured")]
    ConfigurationMissing,

    #[display("Failed to send message. Please try again later.")]
    DeliveryFailed { detail: Option<String> },

    #[display("Endpoint not found")]
    RouteNotFound,

    #[display("Something went wrong!")]
    UnhandledFault,
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors.iter()
        .map(|e| format!("{}:{}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ResponseError for ContactError {
    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ContactError::ValidationFailed(errors) => {
                serde_json::json!({
                    "success": false,
                    "errors": errors
                })
            }
            ContactError::DeliveryFailed { detail: Some(detail) } => {
                serde_json::json!({
                    "success": false,
                    "message": self.to_string(),
                    "error": detail
                })
            }
            _ => {
                serde_json::json!({
                    "success": false,
                    "message": self.to_string()
                })
            }
        };
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ContactError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            ContactError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            ContactError::ConfigurationMissing => StatusCode::INTERNAL_SERVER_ERROR,
            ContactError::DeliveryFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ContactError::RouteNotFound => StatusCode::NOT_FOUND,
            ContactError::UnhandledFault => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for ContactError {
    fn from(errors: ValidationErrors) -> Self {
        let mut field_errors: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(|e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "Invalid value".to_string()),
                })
            })
            .collect();

        field_errors.sort_by_key(|e| {
            FIELD_ORDER
                .iter()
                .position(|f| *f == e.field)
                .unwrap_or(FIELD_ORDER.len())
        });

        ContactError::ValidationFailed(field_errors)
    }
}

impl ContactError {
    pub fn to_http_response(&self) -> HttpResponse {
        self.error_response()
    }
}

/// Failures raised by an email provider.
#[derive(Debug, Display, Error)]
pub enum EmailError {
    #[display("Email provider API key is missing")]
    MissingApiKey,

    #[display("Email provider rejected the message ({status}): {message}")]
    Provider {
        status: u16,
        message: String,
    },

    #[display("Email transport error: {_0}")]
    Transport(reqwest::Error),
}

impl From<reqwest::Error> for EmailError {
    fn from(err: reqwest::Error) -> Self {
        EmailError::Transport(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}
