use crate::error::AppError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token lifetime in seconds. A new token requires a fresh login; there is
/// no refresh or rotation.
const TOKEN_TTL_SECS: i64 = 60 * 60;

/// Claims encoded within an issued JWT.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the authenticated user's id.
    pub sub: Uuid,
    /// Expiration timestamp, seconds since epoch.
    pub exp: usize,
}

/// Signs a token for the given user id, expiring in one hour.
///
/// The signing secret comes from the process configuration; it is passed in
/// rather than read from the environment, and never logged.
pub fn generate_token(secret: &str, user_id: Uuid) -> Result<String, AppError> {
    let expiration = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::seconds(TOKEN_TTL_SECS))
        .expect("valid timestamp")
        .timestamp() as usize;

    let claims = Claims {
        sub: user_id,
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("failed to generate token: {}", e)))
}

/// Verifies a token string and decodes its claims.
///
/// Every failure collapses to `TokenInvalid`: bad signature, malformed
/// payload, missing `exp`, or an expired token. The detail is logged and the
/// client sees a generic body. Expiry is strict: a token whose `exp` equals
/// the current second is already expired, so a token passes only while
/// `now < exp`.
pub fn verify_token(secret: &str, token: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        log::debug!("token verification failed: {}", e);
        AppError::TokenInvalid
    })?;

    // The library still accepts a token at the exact expiry second; the
    // boundary here is exclusive.
    if claims.exp <= chrono::Utc::now().timestamp() as usize {
        log::debug!("token verification failed: expired");
        return Err(AppError::TokenInvalid);
    }

    Ok(claims)
}
