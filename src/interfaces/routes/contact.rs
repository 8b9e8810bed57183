use actix_web::{guard, web};

use crate::{handlers::contact::submit_contact, middlewares::rate_limit::RateLimitMiddleware};

/// Only POST matches, so other methods fall through to the 404 handler
/// without touching the limiter.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/contact")
            .guard(guard::Post())
            .wrap(RateLimitMiddleware)
            .route(web::post().to(submit_contact))
    );
}
