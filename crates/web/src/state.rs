use axum::extract::FromRef;
use storage::Database;

use crate::auth::jwt::JwtConfig;
use crate::registry::WorkoutRegistry;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: JwtConfig,
    pub registry: WorkoutRegistry,
}

impl AppState {
    pub fn new(db: Database, jwt: JwtConfig) -> Self {
        Self {
            db,
            jwt,
            registry: WorkoutRegistry::new(),
        }
    }
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl FromRef<AppState> for JwtConfig {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}

impl FromRef<AppState> for WorkoutRegistry {
    fn from_ref(state: &AppState) -> Self {
        state.registry.clone()
    }
}
