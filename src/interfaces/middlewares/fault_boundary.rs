use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures_util::{
    future::{ok, Ready, LocalBoxFuture},
    FutureExt,
};
use std::{any::Any, panic::AssertUnwindSafe, rc::Rc, task::{Context, Poll}};

use crate::errors::ContactError;

/// Turns a panic anywhere below it into a logged, generic 500 response.
///
/// No handle to the request is kept while the inner service runs: the
/// router needs sole ownership of it to record path matches.
pub struct FaultBoundary;

impl<S, B> Transform<S, ServiceRequest> for FaultBoundary
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = FaultBoundaryService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(FaultBoundaryService {
            service: Rc::new(service),
        })
    }
}

pub struct FaultBoundaryService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for FaultBoundaryService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let method = req.method().clone();
        let path = req.path().to_string();

        Box::pin(async move {
            let outcome = AssertUnwindSafe(async move { service.call(req).await })
                .catch_unwind()
                .await;

            match outcome {
                Ok(result) => result,
                Err(panic) => {
                    tracing::error!(
                        %method,
                        %path,
                        "Unhandled fault while processing request: {}",
                        panic_message(panic.as_ref())
                    );
                    Err(ContactError::UnhandledFault.into())
                }
            }
        })
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "unknown panic payload"
    }
}
