//! Authentication types for the admin JWT.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// JWT claims for admin access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (admin email).
    pub sub: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for the admin identity.
    #[must_use]
    pub fn new(email: &str, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: email.to_string(),
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the admin email from the claims.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.sub
    }
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Admin email.
    pub email: String,
    /// Admin password.
    pub password: String,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Access token.
    pub token: String,
    /// Token expiration in seconds.
    pub expires_in: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_claims_carry_email_and_expiry() {
        let expires_at = Utc::now() + Duration::hours(2);
        let claims = Claims::new("admin@example.com", expires_at);

        assert_eq!(claims.email(), "admin@example.com");
        assert_eq!(claims.exp, expires_at.timestamp());
        assert!(claims.iat <= claims.exp);
    }
}
