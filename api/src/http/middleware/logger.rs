/// Request outcome logging
///
/// One line per request, tagged with whether the caller was served,
/// turned away as unauthenticated, or hit an internal failure.
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::StatusCode,
    Error, HttpMessage,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    time::Instant,
};

use super::request_id::RequestIdValue;

pub struct OutcomeLogger;

impl<S, B> Transform<S, ServiceRequest> for OutcomeLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = OutcomeLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(OutcomeLoggerMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct OutcomeLoggerMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for OutcomeLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let remote_addr = req
            .connection_info()
            .peer_addr()
            .unwrap_or("unknown")
            .to_string();

        let request_id = req
            .extensions()
            .get::<RequestIdValue>()
            .map(|r| r.0.clone())
            .unwrap_or_else(|| "unknown".to_string());

        let service = self.service.clone();

        Box::pin(async move {
            let res = service.call(req).await?;
            let duration_ms = start.elapsed().as_millis();
            let status = res.status();
            let outcome = Outcome::of(status);

            match outcome {
                Outcome::Failed => tracing::warn!(
                    request_id = %request_id,
                    method = %method,
                    path = %path,
                    status = status.as_u16(),
                    outcome = outcome.as_str(),
                    duration_ms = %duration_ms,
                    remote_addr = %remote_addr,
                    "Request failed"
                ),
                Outcome::Rejected => tracing::info!(
                    request_id = %request_id,
                    method = %method,
                    path = %path,
                    status = status.as_u16(),
                    outcome = outcome.as_str(),
                    duration_ms = %duration_ms,
                    remote_addr = %remote_addr,
                    "Request rejected: caller not authenticated"
                ),
                Outcome::Served | Outcome::ClientError => tracing::info!(
                    request_id = %request_id,
                    method = %method,
                    path = %path,
                    status = status.as_u16(),
                    outcome = outcome.as_str(),
                    duration_ms = %duration_ms,
                    remote_addr = %remote_addr,
                    "Request served"
                ),
            }

            Ok(res)
        })
    }
}

/// How a request ended, as far as callers of the deposit API are concerned.
/// A 401 is an authentication verdict; a 5xx means a collaborator let us down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Served,
    Rejected,
    ClientError,
    Failed,
}

impl Outcome {
    pub fn of(status: StatusCode) -> Self {
        if status == StatusCode::UNAUTHORIZED {
            Outcome::Rejected
        } else if status.is_server_error() {
            Outcome::Failed
        } else if status.is_client_error() {
            Outcome::ClientError
        } else {
            Outcome::Served
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Served => "served",
            Outcome::Rejected => "unauthorized",
            Outcome::ClientError => "client_error",
            Outcome::Failed => "server_error",
        }
    }
}
