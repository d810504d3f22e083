//! CLI interface for the academic portal

pub mod commands;
mod output;

pub use output::*;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "academic-portal")]
#[command(author = "Krakaw")]
#[command(version = "1.0.0")]
#[command(about = "Academic portal demo with a mock authentication backend", long_about = None)]
pub struct Cli {
    /// Path to portal.toml (searched upward from the current directory by default)
    #[arg(short, long, global = true, env = "PORTAL_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default portal.toml
    Init,

    /// Start the HTTP API server
    Serve {
        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List the accounts the server will be seeded with
    Accounts {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Log in against a running server and keep the session under watch.
    /// Each line typed on stdin counts as keyboard activity; "logout" logs out.
    Client {
        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "PORTAL_PASSWORD")]
        password: String,

        /// Server URL (overrides the config file)
        #[arg(long)]
        base_url: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}
