pub mod exercise;
pub mod set_log;
pub mod user;
pub mod workout_session;
