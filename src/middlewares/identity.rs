use crate::error::AppError;
use actix_web::http::Method;
use actix_web::{
    Error, FromRequest, HttpMessage, HttpRequest,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};

/// Header carrying the caller's Telegram account id, as asserted by the bot or mini-app
pub const IDENTITY_HEADER: &str = "X-Telegram-Id";

/// Identity of the caller, inserted by `IdentityMiddleware`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerId(pub i64);

impl FromRequest for CallerId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<CallerId>()
                .copied()
                .ok_or_else(|| AppError::AuthError("Missing caller identity".to_string()).into()),
        )
    }
}

struct PublicPaths {
    exact_paths: Vec<&'static str>,
    prefix_paths: Vec<&'static str>,
}

impl PublicPaths {
    fn new() -> Self {
        Self {
            exact_paths: vec![
                "/swagger-ui",
                "/api-docs/openapi.json",
                "/api/v1/health",
                "/api/v1/settings/public",
            ],
            prefix_paths: vec!["/swagger-ui/", "/api-docs/"],
        }
    }

    fn is_public_path(&self, path: &str) -> bool {
        self.exact_paths.contains(&path)
            || self
                .prefix_paths
                .iter()
                .any(|&prefix| path.starts_with(prefix))
    }
}

fn parse_identity(req: &ServiceRequest) -> Result<i64, AppError> {
    let raw = req
        .headers()
        .get(IDENTITY_HEADER)
        .ok_or_else(|| AppError::AuthError(format!("Missing {IDENTITY_HEADER} header")))?;
    raw.to_str()
        .ok()
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::AuthError(format!("Invalid {IDENTITY_HEADER} header")))
}

/// Trusts the numeric identity supplied by the caller; there is no further authentication
pub struct IdentityMiddleware;

impl<S, B> Transform<S, ServiceRequest> for IdentityMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = IdentityMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(IdentityMiddlewareService {
            service,
            public_paths: PublicPaths::new(),
        }))
    }
}

pub struct IdentityMiddlewareService<S> {
    service: S,
    public_paths: PublicPaths,
}

impl<S, B> Service<ServiceRequest> for IdentityMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // CORS preflight carries no custom headers
        if req.method() == Method::OPTIONS || self.public_paths.is_public_path(req.path()) {
            return Box::pin(self.service.call(req));
        }

        match parse_identity(&req) {
            Ok(id) => {
                req.extensions_mut().insert(CallerId(id));
                Box::pin(self.service.call(req))
            }
            Err(error) => Box::pin(async move { Err(error.into()) }),
        }
    }
}
