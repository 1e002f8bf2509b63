//! HS256 access tokens carrying the signed-in user's identity.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use storage::models::Identity;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub exp: i64,
    pub iat: i64,
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            username: claims.username,
            full_name: claims.full_name,
        }
    }
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiry_mins: i64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, expiry_mins: i64) -> Self {
        Self {
            secret: secret.into(),
            expiry_mins,
        }
    }

    /// Token lifetime in seconds
    pub fn expires_in(&self) -> i64 {
        self.expiry_mins * 60
    }
}

pub fn generate_access_token(
    identity: &Identity,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();

    let claims = Claims {
        sub: identity.user_id,
        email: identity.email.clone(),
        username: identity.username.clone(),
        full_name: identity.full_name.clone(),
        exp: now + config.expires_in(),
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Checks signature and expiry, returning the embedded claims.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig::new("test-secret-that-is-long-enough-for-hmac", 60)
    }

    fn identity() -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            email: "mert@example.com".to_string(),
            username: "mert".to_string(),
            full_name: "Mert Kaya".to_string(),
        }
    }

    #[test]
    fn test_token_round_trips_identity() {
        let config = test_config();
        let identity = identity();

        let token = generate_access_token(&identity, &config).unwrap();
        let claims = validate_token(&token, &config).unwrap();

        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(Identity::from(claims), identity);
    }

    #[test]
    fn test_expired_token_fails() {
        let config = test_config();
        let identity = identity();
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: identity.user_id,
            email: identity.email,
            username: identity.username,
            full_name: identity.full_name,
            exp: now - 300,
            iat: now - 600,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn test_different_secret_fails() {
        let token = generate_access_token(&identity(), &test_config()).unwrap();
        let other = JwtConfig::new("another-secret", 60);

        assert!(validate_token(&token, &other).is_err());
    }
}
