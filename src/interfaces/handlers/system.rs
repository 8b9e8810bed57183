use actix_web::{get, HttpResponse, Responder};
use humantime::format_duration;
use chrono::Utc;
use serde::Serialize;
use std::time::Duration;

use crate::constants::START_TIME;

#[derive(Serialize)]
struct HealthCheckResponse {
    status: &'static str,
    timestamp: String,
    uptime: String,
}

/// Liveness probe. Touches neither the limiter nor the mail configuration.
#[get("/health")]
pub async fn health_check() -> impl Responder {
    let now_utc = Utc::now();
    let uptime_secs = now_utc.signed_duration_since(*START_TIME).num_seconds().max(0) as u64;

    HttpResponse::Ok().json(HealthCheckResponse {
        status: "OK",
        timestamp: now_utc.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        uptime: format_duration(Duration::from_secs(uptime_secs)).to_string(),
    })
}
