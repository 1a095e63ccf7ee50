//! Authorization middleware
//!
//! Wraps every route, runs the gate, and short-circuits denials with the
//! JSON deny body. Allowed requests pass through unmodified; the gate does
//! not enrich the request with the resolved identity.

use crate::auth::{Decision, DenyReason};
use crate::server::AppState;
use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{web, HttpResponse};
use futures::future::{ready, Ready};
use std::future::Future;
use std::pin::Pin;
use tracing::error;

/// Authorization middleware for actix-web
pub struct AuthzMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthzMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = AuthzMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthzMiddlewareService { service }))
    }
}

/// Service implementation for the authorization middleware
pub struct AuthzMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthzMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let method = req.method().clone();
        let path = req.path().to_string();
        let authorization = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(|h| h.to_string());

        let decision = match req.app_data::<web::Data<AppState>>() {
            Some(state) => state.gate.authorize(&method, &path, authorization.as_deref()),
            None => {
                // The state is registered at app construction; reaching
                // this arm means the server is miswired. Fail closed.
                error!("authorization state missing from app data");
                Decision::Denied(DenyReason::Internal)
            }
        };

        match decision {
            Decision::Denied(reason) => {
                let (req, _payload) = req.into_parts();
                let response = HttpResponse::build(reason.status())
                    .json(serde_json::json!({ "message": reason.message() }))
                    .map_into_right_body();
                Box::pin(async move { Ok(ServiceResponse::new(req, response)) })
            }
            _ => {
                let fut = self.service.call(req);
                Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
            }
        }
    }
}
