//! Academic portal - mock authentication backend and session client
//!
//! The library exposes the HTTP API (login with lockout, account status,
//! password recovery, session checks) and the client-side watchdog that
//! logs a user out after inactivity or when the server drops the session.

pub mod api;
pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;

pub use config::Config;
pub use error::Error;
