use actix_web::{http::StatusCode, HttpResponse};

pub fn json_error(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(serde_json::json!({
        "success": false,
        "message": message
    }))
}
