use crate::{
    auth::{generate_token, hash_password, verify_password, AuthResponse, LoginRequest, RegisterRequest},
    config::Config,
    error::AppError,
    models::{User, UserResponse},
};
use actix_web::{post, web, HttpResponse, Responder};
use sqlx::PgPool;

/// Register a new user.
///
/// Validates the body, hashes the password and persists the identity.
/// Responds with the new user's id, name and email; the digest never leaves
/// the process. Duplicate emails are resolved by the store's unique index
/// rather than a lookup, so concurrent registrations cannot race past each
/// other.
#[post("/register")]
pub async fn register(
    pool: web::Data<PgPool>,
    body: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    body.validate()?;

    let digest = hash_password(&body.password)?;
    let user = User::create(&pool, &body.name, &body.email, &digest).await?;

    log::info!("registered user {}", user.id);
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Login with email and password.
///
/// An unknown email and a wrong password both produce the same generic
/// failure, so a caller cannot tell which addresses are registered.
/// A storage fault during lookup is a distinct 500, not an auth failure.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    body: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    body.validate()?;

    let user = User::find_by_email(&pool, &body.email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&body.password, &user.password_hash) {
        return Err(AppError::InvalidCredentials);
    }

    let token = generate_token(&config.jwt_secret, user.id)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        id: user.id,
        auth: true,
        token,
    }))
}
