//! Error types for the academic portal
//!
//! Display strings of the authentication variants are the user-facing
//! messages sent back to the browser, so they stay in Portuguese.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::auth::MAX_LOGIN_ATTEMPTS;

/// Why a login was refused on a locked account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lockout {
    /// This attempt exhausted the remaining tries
    JustLocked,
    /// The account was already locked before this attempt
    AlreadyLocked,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Email não encontrado!")]
    AccountNotFound,

    #[error("{}", lockout_message(.0))]
    AccountLocked(Lockout),

    #[error("Senha incorreta! Tentativas restantes: {remaining}")]
    InvalidCredentials { remaining: u32 },

    #[error("Email é obrigatório!")]
    EmailRequired,

    #[error("Email não encontrado no sistema!")]
    EmailNotFound,

    #[error("Sessão inválida ou expirada")]
    SessionInvalid,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file not found. Run 'academic-portal init' first.")]
    ConfigNotFound,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

fn lockout_message(lockout: &Lockout) -> String {
    match lockout {
        Lockout::JustLocked => {
            format!("Conta bloqueada após {} tentativas inválidas!", MAX_LOGIN_ATTEMPTS)
        }
        Lockout::AlreadyLocked => "Conta bloqueada devido a múltiplas tentativas de login inválidas! \
             O bloqueio permanece até o servidor ser reiniciado."
            .to_string(),
    }
}

impl Error {
    /// Default HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::AccountNotFound | Error::EmailNotFound => StatusCode::NOT_FOUND,
            Error::AccountLocked(_) | Error::InvalidCredentials { .. } | Error::SessionInvalid => {
                StatusCode::UNAUTHORIZED
            }
            Error::EmailRequired => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the message is safe to show to the end user
    pub fn is_user_facing(&self) -> bool {
        self.status_code() != StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

/// Failure envelope: `{ "success": false, "message": ... }`
#[derive(Debug, serde::Serialize)]
struct Failure {
    success: bool,
    message: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if self.is_user_facing() {
            self.to_string()
        } else {
            tracing::error!("Internal error: {}", self);
            "Erro interno do servidor".to_string()
        };

        (
            status,
            Json(Failure {
                success: false,
                message,
            }),
        )
            .into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
