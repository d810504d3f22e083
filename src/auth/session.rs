//! Session management
//!
//! Sessions live in memory only. Idle time is measured with tokio's
//! monotonic clock so it is immune to wall-clock jumps and can be driven
//! by paused time in tests.

use crate::auth::models::PublicAccount;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// Default idle window before a session expires
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Session information
#[derive(Debug, Clone)]
pub struct Session {
    /// Opaque session token
    pub id: String,
    /// Account that owns this session
    pub account: PublicAccount,
    /// When the session was created
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Last authenticated request
    pub last_activity: Instant,
}

impl Session {
    /// Create a new session with a fresh random token
    pub fn new(account: PublicAccount) -> Self {
        Self {
            id: generate_token(),
            account,
            created_at: chrono::Utc::now(),
            last_activity: Instant::now(),
        }
    }

    /// Idle for longer than `timeout`
    pub fn is_expired(&self, timeout: Duration) -> bool {
        self.last_activity.elapsed() > timeout
    }

    /// Update last activity time
    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }
}

/// 256-bit token from the thread-local CSPRNG, hex encoded
pub fn generate_token() -> String {
    hex::encode(rand::random::<[u8; 32]>())
}

/// In-memory session store. Clones share the same map.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    timeout: Duration,
}

impl SessionStore {
    /// Create a store whose sessions expire after `timeout` of inactivity
    pub fn new(timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Create a new session and return its token
    pub async fn create(&self, account: PublicAccount) -> String {
        let session = Session::new(account);
        let session_id = session.id.clone();
        self.sessions
            .write()
            .await
            .insert(session_id.clone(), session);
        session_id
    }

    /// Refresh a valid session. Expired sessions are dropped, not revived.
    pub async fn touch(&self, session_id: &str) -> bool {
        self.touch_and_get(session_id).await.is_some()
    }

    /// Refresh a valid session and return a copy of it
    pub async fn touch_and_get(&self, session_id: &str) -> Option<Session> {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(session_id) {
            if session.is_expired(self.timeout) {
                sessions.remove(session_id);
                return None;
            }
            session.touch();
            return Some(session.clone());
        }
        None
    }

    /// Whether the token names a live session. Does not refresh it.
    pub async fn validate(&self, session_id: &str) -> bool {
        self.sessions
            .read()
            .await
            .get(session_id)
            .is_some_and(|s| !s.is_expired(self.timeout))
    }

    /// Delete a session, returning whether it existed
    pub async fn remove(&self, session_id: &str) -> bool {
        self.sessions.write().await.remove(session_id).is_some()
    }

    /// Drop every expired session, returning how many were removed
    pub async fn sweep(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(self.timeout));
        before - sessions.len()
    }

    /// Get session count
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::AccountRole;

    fn account() -> PublicAccount {
        PublicAccount {
            id: 1,
            name: "Aluno 1".to_string(),
            email: "aluno1@universidade.edu.br".to_string(),
            role: AccountRole::Aluno,
            course: "Engenharia de Software".to_string(),
        }
    }

    #[test]
    fn test_token_shape() {
        let token = generate_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_token());
    }

    #[tokio::test]
    async fn test_create_and_validate_session() {
        let store = SessionStore::default();
        let id = store.create(account()).await;

        assert!(store.validate(&id).await);
        let session = store.touch_and_get(&id).await.unwrap();
        assert_eq!(session.account.email, "aluno1@universidade.edu.br");
    }

    #[tokio::test]
    async fn test_remove_session() {
        let store = SessionStore::default();
        let id = store.create(account()).await;

        assert!(store.remove(&id).await);
        assert!(!store.remove(&id).await);
        assert!(!store.validate(&id).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_expiration() {
        let store = SessionStore::default();
        let id = store.create(account()).await;

        tokio::time::advance(DEFAULT_SESSION_TIMEOUT + Duration::from_secs(1)).await;

        assert!(!store.validate(&id).await);
        assert!(!store.touch(&id).await);
        assert_eq!(store.len().await, 0);
    }
}
