use actix_web::{dev::Server, middleware::NormalizePath, web, App, HttpServer};
use once_cell::sync::Lazy;
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

use crate::{
    constants::START_TIME,
    middlewares::fault_boundary::FaultBoundary,
    routes::configure_routes,
    settings::AppConfig,
    web::{build_cors, security_headers},
    AppState,
};

/// Builds the HTTP server on an already bound listener.
pub fn run(
    listener: TcpListener,
    state: web::Data<AppState>,
    config: &AppConfig,
) -> std::io::Result<Server> {
    run_with_routes(listener, state, config, configure_routes)
}

/// Same middleware stack as [`run`], with a caller supplied route table.
pub fn run_with_routes(
    listener: TcpListener,
    state: web::Data<AppState>,
    config: &AppConfig,
    routes: fn(&mut web::ServiceConfig),
) -> std::io::Result<Server> {
    // Uptime counts from server start, not from the first health probe.
    Lazy::force(&START_TIME);

    let config = config.clone();
    let workers = config.worker_count.max(1);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(FaultBoundary)
            .wrap(NormalizePath::trim())
            .wrap(build_cors(&config))
            .wrap(security_headers())
            .wrap(TracingLogger::default())
            .configure(routes)
    })
    .listen(listener)?
    .workers(workers)
    .run();

    Ok(server)
}
