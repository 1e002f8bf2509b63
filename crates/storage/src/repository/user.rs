use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::{NewUser, User};

pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, email, username, full_name, password_hash, created_at
            FROM users
            WHERE lower(email) = lower($1)
            "#,
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, email, username, full_name, password_hash, created_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Create a user, mapping duplicate email/username to a constraint violation
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, username, full_name, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING user_id, email, username, full_name, password_hash, created_at
            "#,
        )
        .bind(&new_user.email)
        .bind(&new_user.username)
        .bind(&new_user.full_name)
        .bind(&new_user.password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(StorageError::from);

        match result {
            Err(e) if e.is_unique_violation() => Err(StorageError::ConstraintViolation(
                "Email or username is already taken".to_string(),
            )),
            other => other,
        }
    }
}
