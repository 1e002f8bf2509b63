use anyhow::{Context, Result, ensure};

const DEFAULT_JWT_EXPIRY_MINS: i64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiry_mins: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let jwt_secret =
            std::env::var("JWT_SECRET").context("Cannot load JWT_SECRET env variable")?;
        ensure!(!jwt_secret.is_empty(), "JWT_SECRET must not be empty");

        let jwt_expiry_mins = match std::env::var("JWT_EXPIRY_MINS") {
            Ok(value) => value
                .parse()
                .context("JWT_EXPIRY_MINS must be a number")?,
            Err(_) => DEFAULT_JWT_EXPIRY_MINS,
        };

        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("Cannot load PORT env variable")?
                .parse()
                .context("PORT must be a number")?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            jwt_secret,
            jwt_expiry_mins,
        })
    }
}
