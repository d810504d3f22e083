//! Where the client remembers its session between runs

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::warn;

use super::api::ClientSession;

pub trait SessionStorage: Send {
    fn load(&self) -> Option<ClientSession>;
    fn save(&mut self, session: &ClientSession);
    fn clear(&mut self);
}

/// Process-local storage. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<ClientSession>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: ClientSession) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(session))),
        }
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Option<ClientSession> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }

    fn save(&mut self, session: &ClientSession) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(session.clone());
        }
    }

    fn clear(&mut self) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
    }
}

/// JSON file storage
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Option<ClientSession> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&content) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("Ignoring unreadable session file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn save(&mut self, session: &ClientSession) {
        let result = serde_json::to_string(session)
            .map_err(std::io::Error::from)
            .and_then(|json| std::fs::write(&self.path, json));
        if let Err(e) = result {
            warn!("Failed to save session to {}: {}", self.path.display(), e);
        }
    }

    fn clear(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to remove {}: {}", self.path.display(), e);
            }
        }
    }
}
