//! HTTP API

pub mod routes;
pub mod server;
pub mod sweeper;

pub use server::*;
pub use sweeper::start_session_sweeper;
