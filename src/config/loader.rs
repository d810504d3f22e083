//! Configuration loading and environment variable interpolation

use crate::error::{Error, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::Config;

pub const CONFIG_FILENAME: &str = "portal.toml";

/// Load configuration from portal.toml
pub fn load_config() -> Result<Config> {
    let config_path = find_config_file()?;
    load_config_from_path(&config_path)
}

/// Load an explicit path, else search for portal.toml, else defaults
pub fn load_or_default(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return load_config_from_path(path);
    }

    match load_config() {
        Ok(config) => Ok(config),
        Err(Error::ConfigNotFound) => {
            tracing::info!("No {} found, using defaults", CONFIG_FILENAME);
            Ok(Config::default())
        }
        Err(e) => Err(e),
    }
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|_| Error::ConfigNotFound)?;
    let content = interpolate_env_vars(&content);
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Find the configuration file, searching upward from current directory
fn find_config_file() -> Result<PathBuf> {
    let mut current = env::current_dir().map_err(|e| Error::Config(e.to_string()))?;

    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Ok(config_path);
        }

        if !current.pop() {
            return Err(Error::ConfigNotFound);
        }
    }
}

/// Interpolate environment variables in the format ${VAR_NAME} or ${VAR_NAME:-default}
fn interpolate_env_vars(content: &str) -> String {
    // This regex is a compile-time constant, panicking is acceptable here
    // as it indicates a programming error in the codebase, not a runtime issue
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .expect("Invalid regex pattern - this is a bug in the codebase");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        env::var(var_name).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

/// Generate a default configuration file content
pub fn default_config_content() -> &'static str {
    r#"# Academic portal configuration

[server]
host = "0.0.0.0"
port = 3002

[session]
# Idle seconds before a server session expires
timeout_secs = 300
# Seconds between sweeps of expired sessions
sweep_interval_secs = 60

[client]
base_url = "${PORTAL_URL:-http://localhost:3002}"
idle_timeout_secs = 300
monitor_interval_secs = 30
status_debounce_ms = 1000
# Close the server session too when the idle timer logs the user out
notify_server_on_expiry = false

# Seed accounts. When none are listed the three demo students are used.
[[accounts]]
id = 1
name = "Aluno 1"
email = "aluno1@universidade.edu.br"
password = "123456"
role = "aluno"
course = "Engenharia de Software"

[[accounts]]
id = 2
name = "Aluno 2"
email = "aluno2@universidade.edu.br"
password = "654321"
role = "aluno"
course = "Ciência da Computação"

[[accounts]]
id = 3
name = "Aluno 3"
email = "aluno3@universidade.edu.br"
password = "987654"
role = "aluno"
course = "Sistemas de Informação"
"#
}
