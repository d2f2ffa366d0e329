use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::error::AppError;

/// Extracts the authenticated user's id from request extensions.
///
/// Intended for routes behind `AuthMiddleware`, which validates the bearer
/// token and inserts the subject id into the extensions. If the id is absent
/// the guard did not run, so the request is rejected as unauthorized.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUserId(pub Uuid);

impl FromRequest for AuthenticatedUserId {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Uuid>().copied() {
            Some(user_id) => ready(Ok(AuthenticatedUserId(user_id))),
            None => ready(Err(AppError::TokenMissing.into())),
        }
    }
}
