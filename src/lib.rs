//! Knox JWT fetcher
//!
//! Resolves a reachable Knox gateway among one or more configured candidates
//! and fetches a short-lived access token from it using `Negotiate`
//! (Kerberos/SPNEGO) authentication.

pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod transport;

pub use error::{AppError, Result};
pub use gateway::{GatewaySelector, KnoxToken, TokenFetcher};
