//! In-memory account directory
//!
//! The directory is the only owner of lockout counters. Every login runs
//! under the write lock so a read-modify-write of an account's counter
//! cannot interleave with another login for the same account.

use std::collections::HashSet;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::auth::models::{Account, AccountStatus, FailedAttempt, PublicAccount};
use crate::error::{Error, Lockout, Result};

pub struct AccountDirectory {
    accounts: RwLock<Vec<Account>>,
}

impl AccountDirectory {
    /// Build a directory, rejecting duplicate emails
    pub fn new(accounts: Vec<Account>) -> Result<Self> {
        let mut seen = HashSet::new();
        for account in &accounts {
            if !seen.insert(account.email.as_str()) {
                return Err(Error::Config(format!(
                    "Duplicate account email: {}",
                    account.email
                )));
            }
        }

        Ok(Self {
            accounts: RwLock::new(accounts),
        })
    }

    /// Check credentials and update the lockout counters
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<PublicAccount> {
        let mut accounts = self.accounts.write().await;

        let account = accounts
            .iter_mut()
            .find(|a| a.email == email)
            .ok_or(Error::AccountNotFound)?;

        if account.locked {
            warn!("Login refused for locked account {}", email);
            return Err(Error::AccountLocked(Lockout::AlreadyLocked));
        }

        if !account.password_matches(password) {
            return match account.record_failure() {
                FailedAttempt::Locked => {
                    warn!(
                        "Account {} locked after {} invalid attempts",
                        email, account.failed_attempts
                    );
                    Err(Error::AccountLocked(Lockout::JustLocked))
                }
                FailedAttempt::Remaining(remaining) => {
                    warn!(
                        "Invalid password for {} (attempts={}, remaining={})",
                        email, account.failed_attempts, remaining
                    );
                    Err(Error::InvalidCredentials { remaining })
                }
            };
        }

        if account.failed_attempts > 0 {
            info!(
                "Resetting failed attempts for {} from {} to 0",
                email, account.failed_attempts
            );
        }
        account.record_success();

        Ok(PublicAccount::from(&*account))
    }

    /// Lockout counters for an account
    pub async fn status(&self, email: &str) -> Result<AccountStatus> {
        self.accounts
            .read()
            .await
            .iter()
            .find(|a| a.email == email)
            .map(Account::status)
            .ok_or(Error::AccountNotFound)
    }

    /// Public fields of an account, if it exists
    pub async fn find(&self, email: &str) -> Option<PublicAccount> {
        self.accounts
            .read()
            .await
            .iter()
            .find(|a| a.email == email)
            .map(PublicAccount::from)
    }

    /// Snapshot of every account's status, in directory order
    pub async fn statuses(&self) -> Vec<AccountStatus> {
        self.accounts.read().await.iter().map(Account::status).collect()
    }

    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::{demo_accounts, AccountRole};

    #[test]
    fn test_duplicate_emails_rejected() {
        let accounts = vec![
            Account::new(1, "A", "dup@x.br", "1", AccountRole::Aluno, ""),
            Account::new(2, "B", "dup@x.br", "2", AccountRole::Aluno, ""),
        ];
        assert!(matches!(AccountDirectory::new(accounts), Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_email() {
        let dir = AccountDirectory::new(demo_accounts()).unwrap();
        let result = dir.authenticate("ninguem@universidade.edu.br", "123456").await;
        assert!(matches!(result, Err(Error::AccountNotFound)));
    }

    #[tokio::test]
    async fn test_wrong_password_on_one_account_leaves_others_alone() {
        let dir = AccountDirectory::new(demo_accounts()).unwrap();
        let _ = dir.authenticate("aluno1@universidade.edu.br", "x").await;

        let other = dir.status("aluno2@universidade.edu.br").await.unwrap();
        assert_eq!(other.attempts, 0);
    }

    #[tokio::test]
    async fn test_statuses_in_order() {
        let dir = AccountDirectory::new(demo_accounts()).unwrap();
        let emails: Vec<_> = dir.statuses().await.into_iter().map(|s| s.email).collect();
        assert_eq!(emails[0], "aluno1@universidade.edu.br");
        assert_eq!(dir.len().await, 3);
    }
}
