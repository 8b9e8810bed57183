pub mod handlers;
pub mod mailers;
pub mod middlewares;
pub mod routes;
