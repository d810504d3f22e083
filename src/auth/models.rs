//! Authentication models
//!
//! Field names on the wire follow the portal frontend (`nome`, `tipo`,
//! `tentativas`, ...), so most types carry serde renames.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::MAX_LOGIN_ATTEMPTS;

/// Account roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    /// Student
    #[default]
    Aluno,
    /// Faculty member
    Professor,
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountRole::Aluno => write!(f, "aluno"),
            AccountRole::Professor => write!(f, "professor"),
        }
    }
}

/// Outcome of a wrong password on an unlocked account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedAttempt {
    /// Still usable, with this many tries left
    Remaining(u32),
    /// The counter reached the limit and the account is now locked
    Locked,
}

/// A portal account with credentials and lockout counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: u32,
    pub name: String,
    pub email: String,
    /// Plaintext; this is a demo backend
    pub password: String,
    #[serde(default)]
    pub role: AccountRole,
    #[serde(default)]
    pub course: String,
    #[serde(skip)]
    pub failed_attempts: u32,
    #[serde(skip)]
    pub locked: bool,
}

impl Account {
    /// Create an unlocked account with a clean attempt counter
    pub fn new(
        id: u32,
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        role: AccountRole,
        course: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            password: password.into(),
            role,
            course: course.into(),
            failed_attempts: 0,
            locked: false,
        }
    }

    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password == candidate
    }

    /// Count a wrong password, locking the account once the limit is hit.
    /// The lock never clears for the lifetime of the process.
    pub fn record_failure(&mut self) -> FailedAttempt {
        self.failed_attempts += 1;
        if self.failed_attempts >= MAX_LOGIN_ATTEMPTS {
            self.locked = true;
            FailedAttempt::Locked
        } else {
            FailedAttempt::Remaining(MAX_LOGIN_ATTEMPTS - self.failed_attempts)
        }
    }

    pub fn record_success(&mut self) {
        self.failed_attempts = 0;
    }

    pub fn remaining_attempts(&self) -> u32 {
        if self.locked {
            0
        } else {
            MAX_LOGIN_ATTEMPTS.saturating_sub(self.failed_attempts)
        }
    }

    pub fn status(&self) -> AccountStatus {
        AccountStatus {
            email: self.email.clone(),
            attempts: self.failed_attempts,
            locked: self.locked,
            remaining_attempts: self.remaining_attempts(),
        }
    }
}

/// Public account fields returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicAccount {
    pub id: u32,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "tipo")]
    pub role: AccountRole,
    #[serde(rename = "curso")]
    pub course: String,
}

impl From<&Account> for PublicAccount {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
            role: account.role,
            course: account.course.clone(),
        }
    }
}

/// Lockout counters as reported by the status endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStatus {
    pub email: String,
    #[serde(rename = "tentativas")]
    pub attempts: u32,
    #[serde(rename = "bloqueado")]
    pub locked: bool,
    #[serde(rename = "tentativasRestantes")]
    pub remaining_attempts: u32,
}

/// Login credentials. Older clients send the password as `senha`,
/// newer ones as `password`; both are accepted.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "senha")]
    pub password: String,
}

/// Successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub user: PublicAccount,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RecoveryRequest {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusQuery {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
    pub status: AccountStatus,
}

/// Generic `{ success, message }` envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Reply to a valid session check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    pub success: bool,
    pub message: String,
    pub user: PublicAccount,
}

/// Accounts seeded when the configuration lists none
pub fn demo_accounts() -> Vec<Account> {
    vec![
        Account::new(
            1,
            "Aluno 1",
            "aluno1@universidade.edu.br",
            "123456",
            AccountRole::Aluno,
            "Engenharia de Software",
        ),
        Account::new(
            2,
            "Aluno 2",
            "aluno2@universidade.edu.br",
            "654321",
            AccountRole::Aluno,
            "Ciência da Computação",
        ),
        Account::new(
            3,
            "Aluno 3",
            "aluno3@universidade.edu.br",
            "987654",
            AccountRole::Aluno,
            "Sistemas de Informação",
        ),
    ]
}
