//! Account lookup behind sign-up and sign-in.

use async_trait::async_trait;
use storage::{
    Database,
    dto::auth::SignUpRequest,
    error::StorageError,
    models::{Identity, NewUser},
    repository::user::UserRepository,
};
use thiserror::Error;
use uuid::Uuid;

use super::password::{hash_password, verify_password};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<argon2::password_hash::Error> for AuthError {
    fn from(error: argon2::password_hash::Error) -> Self {
        Self::Hashing(error.to_string())
    }
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_up(&self, request: &SignUpRequest) -> Result<Identity, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    /// Fresh identity for an already authenticated user.
    async fn identity(&self, user_id: Uuid) -> Result<Identity, AuthError>;
}

/// Accounts stored in the `users` table with Argon2id hashes.
#[derive(Clone)]
pub struct DatabaseAuthProvider {
    db: Database,
}

impl DatabaseAuthProvider {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuthProvider for DatabaseAuthProvider {
    async fn sign_up(&self, request: &SignUpRequest) -> Result<Identity, AuthError> {
        let new_user = NewUser {
            email: request.email.trim().to_lowercase(),
            username: request.username.trim().to_string(),
            full_name: request.full_name.trim().to_string(),
            password_hash: hash_password(&request.password)?,
        };

        let user = UserRepository::new(self.db.pool()).create(&new_user).await?;
        tracing::info!(user_id = %user.user_id, "User signed up");

        Ok(Identity::from(user))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let user = UserRepository::new(self.db.pool())
            .find_by_email(email.trim())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            tracing::warn!(user_id = %user.user_id, "Failed sign-in attempt");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(Identity::from(user))
    }

    async fn identity(&self, user_id: Uuid) -> Result<Identity, AuthError> {
        let user = UserRepository::new(self.db.pool()).find_by_id(user_id).await?;
        Ok(Identity::from(user))
    }
}
