use actix_web::{
    web,
    http::StatusCode,
    ResponseError,
    HttpResponse,
    error::{JsonPayloadError, UrlencodedError},
};

use crate::{constants::JSON_BODY_LIMIT, handlers::json_error::json_error};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().limit(JSON_BODY_LIMIT).error_handler(|err, _req| {
        JsonError::from(err).into()
    }));
    cfg.app_data(web::FormConfig::default().limit(JSON_BODY_LIMIT).error_handler(|err, _req| {
        JsonError::from(err).into()
    }));
}

/// Body decoding failure, reported in the same envelope as every other error.
#[derive(Debug)]
pub struct JsonError {
    message: String,
    status: StatusCode
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        json_error(self.status, &self.message)
    }
}

impl From<JsonPayloadError> for JsonError {
    fn from(err: JsonPayloadError) -> Self {
        let status = match err {
            JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            _ => StatusCode::BAD_REQUEST,
        };
        JsonError {
            message: format!("Invalid request body: {}", err),
            status,
        }
    }
}

impl From<UrlencodedError> for JsonError {
    fn from(err: UrlencodedError) -> Self {
        let status = match err {
            UrlencodedError::Overflow { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::BAD_REQUEST,
        };
        JsonError {
            message: format!("Invalid request body: {}", err),
            status,
        }
    }
}
