pub mod auth;
pub mod common;
pub mod exercise;
pub mod workout;
