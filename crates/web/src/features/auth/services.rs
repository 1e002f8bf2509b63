use storage::{
    dto::auth::{AuthResponse, SignInRequest, SignUpRequest},
    models::Identity,
};
use uuid::Uuid;

use crate::auth::{
    jwt::{JwtConfig, generate_access_token},
    provider::AuthProvider,
};
use crate::error::WebError;

const TOKEN_TYPE: &str = "Bearer";

fn issue_token(identity: Identity, jwt: &JwtConfig) -> Result<AuthResponse, WebError> {
    let access_token = generate_access_token(&identity, jwt)
        .map_err(|e| WebError::InternalServerError(format!("Token signing failed: {}", e)))?;

    Ok(AuthResponse {
        access_token,
        token_type: TOKEN_TYPE.to_string(),
        expires_in: jwt.expires_in(),
        user: identity,
    })
}

/// Create an account and sign it in
pub async fn sign_up<P>(
    provider: &P,
    jwt: &JwtConfig,
    request: &SignUpRequest,
) -> Result<AuthResponse, WebError>
where
    P: AuthProvider + ?Sized,
{
    let identity = provider.sign_up(request).await?;
    issue_token(identity, jwt)
}

pub async fn sign_in<P>(
    provider: &P,
    jwt: &JwtConfig,
    request: &SignInRequest,
) -> Result<AuthResponse, WebError>
where
    P: AuthProvider + ?Sized,
{
    let identity = provider.sign_in(&request.email, &request.password).await?;
    tracing::info!(user_id = %identity.user_id, "User signed in");
    issue_token(identity, jwt)
}

pub async fn current_identity<P>(provider: &P, user_id: Uuid) -> Result<Identity, WebError>
where
    P: AuthProvider + ?Sized,
{
    Ok(provider.identity(user_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{jwt::validate_token, provider::AuthError};
    use assert_matches::assert_matches;
    use async_trait::async_trait;

    struct SingleUser {
        identity: Identity,
        password: &'static str,
    }

    #[async_trait]
    impl AuthProvider for SingleUser {
        async fn sign_up(&self, _request: &SignUpRequest) -> Result<Identity, AuthError> {
            Ok(self.identity.clone())
        }

        async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
            if email == self.identity.email && password == self.password {
                Ok(self.identity.clone())
            } else {
                Err(AuthError::InvalidCredentials)
            }
        }

        async fn identity(&self, user_id: Uuid) -> Result<Identity, AuthError> {
            if user_id == self.identity.user_id {
                Ok(self.identity.clone())
            } else {
                Err(AuthError::Storage(storage::error::StorageError::NotFound))
            }
        }
    }

    fn provider() -> SingleUser {
        SingleUser {
            identity: Identity {
                user_id: Uuid::new_v4(),
                email: "elif@example.com".to_string(),
                username: "elif".to_string(),
                full_name: "Elif Sahin".to_string(),
            },
            password: "deadlift-200",
        }
    }

    fn jwt() -> JwtConfig {
        JwtConfig::new("test-secret-that-is-long-enough-for-hmac", 30)
    }

    #[tokio::test]
    async fn test_sign_in_issues_token_for_identity() {
        let provider = provider();
        let jwt = jwt();
        let request = SignInRequest {
            email: "elif@example.com".to_string(),
            password: "deadlift-200".to_string(),
        };

        let response = sign_in(&provider, &jwt, &request).await.unwrap();

        assert_eq!(response.token_type, "Bearer");
        assert_eq!(response.expires_in, 1800);
        assert_eq!(response.user, provider.identity);
        let claims = validate_token(&response.access_token, &jwt).unwrap();
        assert_eq!(claims.sub, provider.identity.user_id);
    }

    #[tokio::test]
    async fn test_sign_in_with_wrong_password_fails() {
        let request = SignInRequest {
            email: "elif@example.com".to_string(),
            password: "wrong".to_string(),
        };

        let result = sign_in(&provider(), &jwt(), &request).await;

        assert_matches!(result, Err(WebError::Auth(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_current_identity_of_unknown_user() {
        let result = current_identity(&provider(), Uuid::new_v4()).await;

        assert_matches!(result, Err(WebError::Auth(AuthError::Storage(_))));
    }
}
