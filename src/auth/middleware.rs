use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};

use crate::auth::token::verify_token;
use crate::error::AppError;

/// Header carrying the bearer token on protected requests.
pub const TOKEN_HEADER: &str = "x-access-token";

/// Access guard for protected scopes.
///
/// Verifies the `x-access-token` header and, on success, binds the resolved
/// user id into the request extensions for downstream handlers. It performs
/// no per-resource authorization; stores scope their queries by the bound
/// user id.
#[derive(Clone)]
pub struct AuthMiddleware {
    secret: String,
}

impl AuthMiddleware {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            secret: self.secret.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    secret: String,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
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
        let header = req.headers().get(TOKEN_HEADER);

        match header {
            // A header that is present but not valid UTF-8 is an invalid
            // token, not a missing one; only the log cares, the client body
            // is the same either way.
            Some(value) => match value.to_str() {
                Ok(token) => match verify_token(&self.secret, token) {
                    Ok(claims) => {
                        req.extensions_mut().insert(claims.sub);
                        let fut = self.service.call(req);
                        Box::pin(fut)
                    }
                    Err(app_err) => Box::pin(async move { Err(app_err.into()) }),
                },
                Err(_) => {
                    let app_err = AppError::TokenInvalid;
                    Box::pin(async move { Err(app_err.into()) })
                }
            },
            None => {
                let app_err = AppError::TokenMissing;
                Box::pin(async move { Err(app_err.into()) })
            }
        }
    }
}
