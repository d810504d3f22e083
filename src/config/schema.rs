//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::auth::models::{demo_accounts, Account};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub client: ClientConfig,

    /// Seed accounts; the demo accounts are used when empty
    #[serde(default)]
    pub accounts: Vec<Account>,
}

/// Server configuration for the HTTP API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3002
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Server-side session lifetime
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Idle seconds before a session expires
    #[serde(default = "default_session_timeout")]
    pub timeout_secs: u64,

    /// Seconds between sweeps of expired sessions
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

fn default_session_timeout() -> u64 {
    300
}

fn default_sweep_interval() -> u64 {
    60
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_session_timeout(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

impl SessionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

/// Portal client and watchdog settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Seconds without user activity before a forced logout
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    /// Seconds between server session checks while logged in
    #[serde(default = "default_monitor_interval")]
    pub monitor_interval_secs: u64,

    /// Delay after the last email edit before looking up its status
    #[serde(default = "default_status_debounce")]
    pub status_debounce_ms: u64,

    /// Also close the server session when the idle timer logs out
    #[serde(default)]
    pub notify_server_on_expiry: bool,
}

fn default_base_url() -> String {
    "http://localhost:3002".to_string()
}

fn default_idle_timeout() -> u64 {
    300
}

fn default_monitor_interval() -> u64 {
    30
}

fn default_status_debounce() -> u64 {
    1000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            idle_timeout_secs: default_idle_timeout(),
            monitor_interval_secs: default_monitor_interval(),
            status_debounce_ms: default_status_debounce(),
            notify_server_on_expiry: false,
        }
    }
}

impl Config {
    /// Accounts to seed the directory with
    pub fn seed_accounts(&self) -> Vec<Account> {
        if self.accounts.is_empty() {
            demo_accounts()
        } else {
            self.accounts.clone()
        }
    }
}
