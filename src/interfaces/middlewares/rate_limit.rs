use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    web, Error,
};
use futures_util::future::{ok, Ready, LocalBoxFuture};
use std::{rc::Rc, task::{Context, Poll}};

use crate::{errors::ContactError, limiter::rate_limiter::RateDecision, utils::get_client_ip::get_client_ip, AppState};

/// Fixed-window limiter for the routes it wraps.
///
/// Runs before the body is extracted, so a limited caller never reaches validation.
pub struct RateLimitMiddleware;

impl<S> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(RateLimitMiddlewareService {
            service: Rc::new(service),
        })
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                tracing::error!("AppState missing in rate limit middleware");
                let response = ContactError::UnhandledFault.to_http_response();
                return Ok(req.into_response(response));
            };

            let client_ip = get_client_ip(req.request(), state.trust_forwarded_for);

            match state.rate_limiter.check(&client_ip) {
                RateDecision::Allowed { count } => {
                    tracing::debug!(client = %client_ip, count, "Contact request admitted");
                    service.call(req).await
                }
                RateDecision::Limited => {
                    tracing::warn!(client = %client_ip, "Rate limit exceeded for contact endpoint");
                    let response = ContactError::RateLimitExceeded.to_http_response();
                    Ok(req.into_response(response))
                }
            }
        })
    }
}
