//! Background sweep of expired sessions
//!
//! Runs on a fixed interval regardless of request traffic, so a session
//! may outlive its timeout by at most one interval before it is removed.

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::auth::SessionStore;

/// Start the sweeper task. Aborting the handle stops it.
pub fn start_session_sweeper(store: SessionStore, period: Duration) -> JoinHandle<()> {
    let handle = tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let removed = store.sweep().await;
            if removed > 0 {
                info!("Swept {} expired session(s)", removed);
            } else {
                debug!("Session sweep found nothing to remove");
            }
        }
    });

    info!("Session sweeper started (every {:?})", period);
    handle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::{AccountRole, PublicAccount};

    fn account() -> PublicAccount {
        PublicAccount {
            id: 9,
            name: "Teste".to_string(),
            email: "teste@universidade.edu.br".to_string(),
            role: AccountRole::Aluno,
            course: String::new(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_removes_idle_sessions() {
        let store = SessionStore::new(Duration::from_secs(300));
        let id = store.create(account()).await;
        let handle = start_session_sweeper(store.clone(), Duration::from_secs(60));

        // Not yet expired at the first sweeps
        tokio::time::sleep(Duration::from_secs(121)).await;
        assert_eq!(store.len().await, 1);

        // Past the timeout, the next sweep clears it
        tokio::time::sleep(Duration::from_secs(240)).await;
        assert_eq!(store.len().await, 0);
        assert!(!store.validate(&id).await);

        handle.abort();
    }
}
