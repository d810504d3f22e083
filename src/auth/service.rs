//! Authentication service
//!
//! Request-level operations over an injected [`AccountDirectory`] and
//! [`SessionStore`]. Holds no globals, so tests can build as many isolated
//! instances as they like.

use std::sync::Arc;
use tracing::{debug, info};

use crate::auth::directory::AccountDirectory;
use crate::auth::models::{AccountStatus, PublicAccount};
use crate::auth::session::SessionStore;
use crate::error::{Error, Result};

/// A successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub session_id: String,
    pub account: PublicAccount,
}

#[derive(Clone)]
pub struct AuthService {
    directory: Arc<AccountDirectory>,
    sessions: SessionStore,
}

impl AuthService {
    pub fn new(directory: Arc<AccountDirectory>, sessions: SessionStore) -> Self {
        Self {
            directory,
            sessions,
        }
    }

    pub fn directory(&self) -> &AccountDirectory {
        &self.directory
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Check credentials and open a session. Blank fields are checked like
    /// any other input: an empty password on a known account is a failed try.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        let account = self.directory.authenticate(email, password).await?;
        let session_id = self.sessions.create(account.clone()).await;

        info!("Login succeeded for {}", email);

        Ok(LoginOutcome {
            session_id,
            account,
        })
    }

    /// Lockout counters for an email
    pub async fn status(&self, email: Option<&str>) -> Result<AccountStatus> {
        let email = required_email(email)?;
        self.directory.status(email).await
    }

    /// Password recovery stub. Nothing is actually sent.
    pub async fn remember_password(&self, email: Option<&str>) -> Result<String> {
        let email = required_email(email)?;

        if self.directory.find(email).await.is_none() {
            return Err(Error::EmailNotFound);
        }

        info!("Password recovery requested for {}", email);
        Ok(format!(
            "Email enviado para {} com instruções para redefinir a senha.",
            email
        ))
    }

    /// Validate a session token, refreshing it when it is still live
    pub async fn check_session(&self, token: Option<&str>) -> Result<PublicAccount> {
        let token = token.ok_or(Error::SessionInvalid)?;
        self.sessions
            .touch_and_get(token)
            .await
            .map(|session| session.account)
            .ok_or(Error::SessionInvalid)
    }

    /// Close a session. Unknown or missing tokens are fine.
    pub async fn logout(&self, token: Option<&str>) -> bool {
        let Some(token) = token else {
            return false;
        };

        let removed = self.sessions.remove(token).await;
        if removed {
            info!("Session closed");
        } else {
            debug!("Logout for unknown session");
        }
        removed
    }
}

fn required_email(email: Option<&str>) -> Result<&str> {
    match email.map(str::trim) {
        Some(email) if !email.is_empty() => Ok(email),
        _ => Err(Error::EmailRequired),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::demo_accounts;

    fn service() -> AuthService {
        let directory = AccountDirectory::new(demo_accounts()).unwrap();
        AuthService::new(Arc::new(directory), SessionStore::default())
    }

    #[tokio::test]
    async fn test_blank_password_counts_as_failure() {
        let svc = service();
        assert!(matches!(
            svc.login("aluno1@universidade.edu.br", "").await,
            Err(Error::InvalidCredentials { remaining: 2 })
        ));

        let status = svc.status(Some("aluno1@universidade.edu.br")).await.unwrap();
        assert_eq!(status.attempts, 1);

        assert!(matches!(
            svc.login("", "123456").await,
            Err(Error::AccountNotFound)
        ));
    }

    #[tokio::test]
    async fn test_blank_status_email() {
        let svc = service();
        assert!(matches!(svc.status(Some("   ")).await, Err(Error::EmailRequired)));
        assert!(matches!(svc.status(None).await, Err(Error::EmailRequired)));
    }

    #[tokio::test]
    async fn test_recovery_trims_email() {
        let svc = service();
        let message = svc
            .remember_password(Some("  aluno2@universidade.edu.br "))
            .await
            .unwrap();
        assert!(message.contains("aluno2@universidade.edu.br"));
    }

    #[tokio::test]
    async fn test_logout_without_token() {
        let svc = service();
        assert!(!svc.logout(None).await);
        assert!(!svc.logout(Some("nope")).await);
    }
}
