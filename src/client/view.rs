//! What the portal shows for a given client state

use serde::Serialize;
use std::fmt;

use crate::auth::models::PublicAccount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Warning,
    Error,
}

/// A message banner
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    /// Stays until replaced instead of fading out
    pub persistent: bool,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
            persistent: false,
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            text: text.into(),
            persistent: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
            persistent: false,
        }
    }

    pub fn persistent(mut self) -> Self {
        self.persistent = true;
        self
    }

    pub fn welcome(email: &str) -> Self {
        Self::success(format!("Bem-vindo, {}!", email)).persistent()
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// The whole screen, derived from state and nothing else
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", rename_all = "lowercase")]
pub enum View {
    Login { notice: Option<Notice> },
    Dashboard { user: PublicAccount, notice: Option<Notice> },
}

impl View {
    pub fn notice(&self) -> Option<&Notice> {
        match self {
            View::Login { notice } | View::Dashboard { notice, .. } => notice.as_ref(),
        }
    }

    pub fn is_dashboard(&self) -> bool {
        matches!(self, View::Dashboard { .. })
    }
}
