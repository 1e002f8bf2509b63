//! Sign-in primitives: access tokens, password hashing and the account
//! lookup behind them.

pub mod jwt;
pub mod password;
pub mod provider;
