pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

pub use extractors::AuthenticatedUserId;
pub use middleware::{AuthMiddleware, TOKEN_HEADER};
pub use password::{hash_password, verify_password};
pub use token::{generate_token, verify_token, Claims};

const MIN_PASSWORD_LEN: usize = 6;

/// Payload for a login request. Absent fields deserialize as empty strings
/// so presence checks and format checks share one code path.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Payload for a registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Shared credential checks, in a fixed order: presence of every required
/// field first, then the email grammar, then password strength. The first
/// failed check wins.
fn validate_credentials(email: &str, password: &str) -> Result<(), AppError> {
    if !validator::validate_email(email) {
        return Err(AppError::InvalidEmail);
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::WeakPassword);
    }
    Ok(())
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.email.is_empty() {
            return Err(AppError::MissingField("email"));
        }
        if self.password.is_empty() {
            return Err(AppError::MissingField("password"));
        }
        validate_credentials(&self.email, &self.password)
    }
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.is_empty() {
            return Err(AppError::MissingField("name"));
        }
        if self.email.is_empty() {
            return Err(AppError::MissingField("email"));
        }
        if self.password.is_empty() {
            return Err(AppError::MissingField("password"));
        }
        validate_credentials(&self.email, &self.password)
    }
}

/// Body returned by a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub id: Uuid,
    pub auth: bool,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_register_request_validation() {
        assert!(register("a", "a@b.com", "123456").validate().is_ok());

        match register("", "a@b.com", "123456").validate() {
            Err(AppError::MissingField("name")) => {}
            other => panic!("expected missing name, got {:?}", other),
        }
        match register("a", "", "123456").validate() {
            Err(AppError::MissingField("email")) => {}
            other => panic!("expected missing email, got {:?}", other),
        }
        match register("a", "a@b.com", "").validate() {
            Err(AppError::MissingField("password")) => {}
            other => panic!("expected missing password, got {:?}", other),
        }
        match register("a", "not-an-email", "123456").validate() {
            Err(AppError::InvalidEmail) => {}
            other => panic!("expected invalid email, got {:?}", other),
        }
        match register("a", "a@b.com", "12345").validate() {
            Err(AppError::WeakPassword) => {}
            other => panic!("expected weak password, got {:?}", other),
        }
    }

    #[test]
    fn test_register_check_order_is_fixed() {
        // A missing name outranks a bad email, and a bad email outranks a
        // short password.
        match register("", "not-an-email", "1").validate() {
            Err(AppError::MissingField("name")) => {}
            other => panic!("expected missing name first, got {:?}", other),
        }
        match register("a", "not-an-email", "1").validate() {
            Err(AppError::InvalidEmail) => {}
            other => panic!("expected invalid email before weak password, got {:?}", other),
        }
    }

    #[test]
    fn test_login_request_validation() {
        let valid = LoginRequest {
            email: "test@example.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(valid.validate().is_ok());

        let missing_email = LoginRequest {
            email: String::new(),
            password: "password123".to_string(),
        };
        match missing_email.validate() {
            Err(AppError::MissingField("email")) => {}
            other => panic!("expected missing email, got {:?}", other),
        }

        let bad_email = LoginRequest {
            email: "testexample.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(matches!(bad_email.validate(), Err(AppError::InvalidEmail)));

        let short_password = LoginRequest {
            email: "test@example.com".to_string(),
            password: "123".to_string(),
        };
        assert!(matches!(
            short_password.validate(),
            Err(AppError::WeakPassword)
        ));
    }
}
