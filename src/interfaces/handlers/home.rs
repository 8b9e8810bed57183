use actix_web::{get, HttpResponse, Responder};

#[get("/")]
pub async fn home() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Contact Form Backend API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "contact": "POST /api/contact"
        }
    }))
}

pub async fn not_found() -> impl Responder {
    crate::errors::ContactError::RouteNotFound.to_http_response()
}
