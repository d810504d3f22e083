//! CLI command implementations

use anyhow::Result;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::{info, print_account_table, print_view, success, warn, AccountSummary, OutputFormat};
use crate::client::{
    spawn_watchdog, ActivityKind, ClientEvent, FileStorage, HttpPortal, WatchdogConfig,
};
use crate::config::{self, loader::CONFIG_FILENAME, Config};

/// Where the CLI client keeps its session between runs
const SESSION_FILE: &str = ".portal-session.json";

/// Initialize a new portal.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = Path::new(CONFIG_FILENAME);

    if config_path.exists() {
        warn(&format!("{} already exists", CONFIG_FILENAME));
        return Ok(());
    }

    fs::write(config_path, config::loader::default_config_content())?;

    success(&format!("Created {}", CONFIG_FILENAME));
    info("Run 'academic-portal serve' to start the API");

    Ok(())
}

/// Start the HTTP API server
pub async fn serve(config_path: Option<&Path>, host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = load_config(config_path)?;
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    info(&format!("Starting server at http://{}:{}", host, port));
    info(&format!(
        "Sessions expire after {}s of inactivity",
        config.session.timeout_secs
    ));

    crate::api::run_server(config, &host, port).await?;
    Ok(())
}

/// List seeded accounts
pub async fn accounts(config_path: Option<&Path>, format: OutputFormat) -> Result<()> {
    let config = load_config(config_path)?;
    let accounts = config.seed_accounts();

    match format {
        OutputFormat::Table => print_account_table(&accounts),
        OutputFormat::Json => {
            let summaries: Vec<AccountSummary> = accounts.iter().map(Into::into).collect();
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }
        OutputFormat::Yaml => {
            let summaries: Vec<AccountSummary> = accounts.iter().map(Into::into).collect();
            println!("{}", serde_yaml::to_string(&summaries)?);
        }
    }

    Ok(())
}

/// Log in and keep the session alive from the terminal.
///
/// Input lines: `logout`, `hide`, `show`, `recover <email>`, `close`, `quit`.
/// Anything else counts as keyboard activity. `quit` keeps the stored
/// session for the next run; `close` discards it like closing the tab.
pub async fn client(
    config_path: Option<&Path>,
    email: String,
    password: String,
    base_url: Option<String>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let base_url = base_url.unwrap_or_else(|| config.client.base_url.clone());

    let api = Arc::new(HttpPortal::new(&base_url)?);
    let storage = FileStorage::new(SESSION_FILE);
    let handle = spawn_watchdog(api, storage, WatchdogConfig::from(&config.client));

    info(&format!("Connecting to {}", base_url));

    let mut views = handle.views();
    let printer = tokio::spawn(async move {
        print_view(&views.borrow_and_update().clone());
        while views.changed().await.is_ok() {
            let view = views.borrow_and_update().clone();
            print_view(&view);
        }
    });

    handle
        .send(ClientEvent::LoginSubmitted { email, password })
        .await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let event = match line {
            "quit" | "exit" => break,
            "close" => {
                handle.send(ClientEvent::TabClosed).await;
                break;
            }
            "logout" => ClientEvent::LogoutRequested,
            "hide" => ClientEvent::VisibilityChanged { visible: false },
            "show" => ClientEvent::VisibilityChanged { visible: true },
            _ => match line.strip_prefix("recover ") {
                Some(email) => ClientEvent::RecoverySubmitted(email.to_string()),
                None => ClientEvent::Activity(ActivityKind::Key),
            },
        };
        if !handle.send(event).await {
            break;
        }
    }

    handle.shutdown().await;
    printer.abort();

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    config::load_or_default(path).map_err(|e| anyhow::anyhow!("{}", e))
}
