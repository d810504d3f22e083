//! Client-side form checks, run before anything goes to the server

use regex::Regex;
use std::sync::OnceLock;

use super::api::ApiFailure;
use super::view::Notice;
use crate::auth::models::AccountStatus;

pub const FILL_ALL_FIELDS: &str = "Por favor, preencha todos os campos.";
pub const CONNECTION_ERROR: &str = "Erro ao conectar com o servidor. Tente novamente.";

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // Constant pattern; failure here is a bug in the codebase
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email pattern")
    })
}

/// Both login fields must be filled in
pub fn validate_login(email: &str, password: &str) -> Result<(), Notice> {
    if email.is_empty() || password.is_empty() {
        return Err(Notice::error(FILL_ALL_FIELDS));
    }
    Ok(())
}

/// Check a recovery email, returning it trimmed
pub fn validate_recovery_email(email: &str) -> Result<&str, Notice> {
    let email = email.trim();
    if email.is_empty() {
        return Err(Notice::error("Email é obrigatório"));
    }
    if !email_pattern().is_match(email) {
        return Err(Notice::error("Por favor, digite um email válido"));
    }
    Ok(email)
}

/// Banner for the server's answer to a recovery request
pub fn recovery_notice(result: &Result<String, ApiFailure>) -> Notice {
    match result {
        Ok(_) => Notice::success("Email de recuperação enviado"),
        Err(ApiFailure::Rejected { status: 404, .. }) => {
            Notice::error("Email não encontrado no sistema")
        }
        Err(ApiFailure::Rejected { message, .. }) => Notice::error(message.clone()),
        Err(ApiFailure::Unreachable(_)) => Notice::error(CONNECTION_ERROR),
    }
}

/// Early warning shown while the user is still typing their email
pub fn lockout_warning(status: &AccountStatus) -> Option<Notice> {
    if status.locked {
        Some(Notice::error(
            "Sua conta está bloqueada devido a múltiplas tentativas de login inválidas.",
        ))
    } else if status.attempts > 0 {
        Some(Notice::warning(format!(
            "Atenção: {} tentativas restantes antes do bloqueio.",
            status.remaining_attempts
        )))
    } else {
        None
    }
}
