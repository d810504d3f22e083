//! Client session watchdog
//!
//! A pure state machine: it is fed events with the current time and
//! answers with effects for the driver to carry out. It never sleeps or
//! does I/O, which keeps every transition testable without a runtime.
//!
//! ```text
//!             login ok / probe ok
//! LoggedOut ──────────────────────▶ Active{deadline} ◀──┐ activity
//!     ▲   restore                      │  │  │           │ (deadline reset)
//!     │ ─────────▶ Verifying ◀─────────┘  │  └───────────┘
//!     │              │   visible          │ hidden
//!     │ probe failed │                    ▼
//!     └──────────────┴──── idle ──── Backgrounded ── visible ──▶ Verifying
//! ```

use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

use super::api::{ClientSession, ProbeOutcome};
use super::forms;
use super::view::{Notice, View};
use crate::auth::models::AccountStatus;
use crate::config::ClientConfig;

pub const IDLE_LOGOUT: &str = "Sessão expirada por inatividade. Faça login novamente.";
pub const SESSION_EXPIRED: &str = "Sua sessão expirou. Faça login novamente.";
pub const SERVER_UNREACHABLE: &str = "Erro de conexão com o servidor. Faça login novamente.";
pub const LOGGED_OUT: &str = "Logout realizado com sucesso!";

#[derive(Debug, Clone)]
pub struct WatchdogConfig {
    pub idle_timeout: Duration,
    pub monitor_interval: Duration,
    pub status_debounce: Duration,
    pub notify_server_on_expiry: bool,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self::from(&ClientConfig::default())
    }
}

impl From<&ClientConfig> for WatchdogConfig {
    fn from(config: &ClientConfig) -> Self {
        Self {
            idle_timeout: Duration::from_secs(config.idle_timeout_secs),
            monitor_interval: Duration::from_secs(config.monitor_interval_secs.max(1)),
            status_debounce: Duration::from_millis(config.status_debounce_ms),
            notify_server_on_expiry: config.notify_server_on_expiry,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyReason {
    /// A stored session found at startup
    Restore,
    /// The tab came back into view
    Visibility,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchdogState {
    LoggedOut,
    /// Waiting for the server to confirm a stored session
    Verifying(VerifyReason),
    /// Logged in with the idle timer armed
    Active { deadline: Instant },
    /// Tab hidden; idle timer paused until it is visible again
    Backgrounded,
}

/// Tracked user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    Pointer,
    Key,
    Scroll,
    Touch,
}

#[derive(Debug, Clone)]
pub enum ClientEvent {
    Restore(Option<ClientSession>),
    LoginSubmitted { email: String, password: String },
    LoginSucceeded(ClientSession),
    LoginFailed(String),
    Activity(ActivityKind),
    /// A timer fired; the machine compares its deadlines against `now`
    Tick,
    VisibilityChanged { visible: bool },
    /// Answer to an `Effect::ProbeStatus`
    ProbeCompleted(ProbeOutcome),
    MonitorTick,
    /// Answer to an `Effect::CheckSession` for `token`
    SessionChecked { token: String, outcome: ProbeOutcome },
    EmailEdited(String),
    AccountStatusFetched(AccountStatus),
    RecoverySubmitted(String),
    RecoveryCompleted(Notice),
    LogoutRequested,
    TabClosed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Login { email: String, password: String },
    ProbeStatus { email: String },
    CheckSession { token: String },
    FetchAccountStatus { email: String },
    RememberPassword { email: String },
    NotifyLogout { token: Option<String> },
    PersistSession(ClientSession),
    ClearSession,
    Render(View),
}

#[derive(Debug, Clone, Copy)]
enum LogoutReason {
    Inactivity,
    Rejected,
    Unreachable,
}

impl LogoutReason {
    fn notice(self) -> Notice {
        match self {
            LogoutReason::Inactivity => Notice::warning(IDLE_LOGOUT),
            LogoutReason::Rejected => Notice::warning(SESSION_EXPIRED),
            LogoutReason::Unreachable => Notice::warning(SERVER_UNREACHABLE),
        }
    }
}

#[derive(Debug, Clone)]
struct PendingLookup {
    email: String,
    due: Instant,
}

pub struct Watchdog {
    config: WatchdogConfig,
    state: WatchdogState,
    session: Option<ClientSession>,
    notice: Option<Notice>,
    login_pending: bool,
    lookup: Option<PendingLookup>,
    /// Last reported tab visibility
    hidden: bool,
}

impl Watchdog {
    pub fn new(config: WatchdogConfig) -> Self {
        Self {
            config,
            state: WatchdogState::LoggedOut,
            session: None,
            notice: None,
            login_pending: false,
            lookup: None,
            hidden: false,
        }
    }

    pub fn config(&self) -> &WatchdogConfig {
        &self.config
    }

    pub fn state(&self) -> &WatchdogState {
        &self.state
    }

    pub fn session(&self) -> Option<&ClientSession> {
        self.session.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(
            self.state,
            WatchdogState::Active { .. } | WatchdogState::Backgrounded
        )
    }

    pub fn login_pending(&self) -> bool {
        self.login_pending
    }

    /// Earliest instant at which a `Tick` has something to do
    pub fn next_deadline(&self) -> Option<Instant> {
        let idle = match self.state {
            WatchdogState::Active { deadline } => Some(deadline),
            _ => None,
        };
        let lookup = self.lookup.as_ref().map(|l| l.due);

        match (idle, lookup) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Render the current state
    pub fn view(&self) -> View {
        let notice = self.notice.clone();
        match (&self.state, &self.session) {
            (WatchdogState::LoggedOut, _) | (WatchdogState::Verifying(VerifyReason::Restore), _) => {
                View::Login { notice }
            }
            (_, Some(session)) => View::Dashboard {
                user: session.user.clone(),
                notice,
            },
            (_, None) => View::Login { notice },
        }
    }

    /// Apply one event. A `Render` effect is appended whenever the view changed.
    pub fn handle(&mut self, event: ClientEvent, now: Instant) -> Vec<Effect> {
        let before = self.view();
        let mut effects = Vec::new();

        match event {
            ClientEvent::Restore(stored) => self.on_restore(stored, &mut effects),
            ClientEvent::LoginSubmitted { email, password } => {
                self.on_login_submitted(email, password, &mut effects)
            }
            ClientEvent::LoginSucceeded(session) => {
                self.on_login_succeeded(session, now, &mut effects)
            }
            ClientEvent::LoginFailed(message) => {
                // Only the answer to a submission still in flight counts
                if self.login_pending {
                    self.login_pending = false;
                    self.notice = Some(Notice::error(message));
                }
            }
            ClientEvent::Activity(_) => {
                if let WatchdogState::Active { deadline } = &mut self.state {
                    *deadline = now + self.config.idle_timeout;
                }
            }
            ClientEvent::Tick => self.on_tick(now, &mut effects),
            ClientEvent::VisibilityChanged { visible } => {
                self.on_visibility(visible, &mut effects)
            }
            ClientEvent::ProbeCompleted(outcome) => self.on_probe(outcome, now, &mut effects),
            ClientEvent::MonitorTick => {
                if let (WatchdogState::Active { .. }, Some(session)) = (&self.state, &self.session)
                {
                    effects.push(Effect::CheckSession {
                        token: session.session_id.clone(),
                    });
                }
            }
            ClientEvent::SessionChecked { token, outcome } => {
                let current = self
                    .session
                    .as_ref()
                    .is_some_and(|s| s.session_id == token);
                if current && self.is_logged_in() {
                    match outcome {
                        ProbeOutcome::Valid => {}
                        ProbeOutcome::Rejected => {
                            self.force_logout(LogoutReason::Rejected, &mut effects)
                        }
                        ProbeOutcome::Unreachable => {
                            self.force_logout(LogoutReason::Unreachable, &mut effects)
                        }
                    }
                }
            }
            ClientEvent::EmailEdited(email) => {
                self.lookup = email.contains('@').then(|| PendingLookup {
                    email,
                    due: now + self.config.status_debounce,
                });
            }
            ClientEvent::AccountStatusFetched(status) => {
                if self.state == WatchdogState::LoggedOut {
                    if let Some(notice) = forms::lockout_warning(&status) {
                        self.notice = Some(notice);
                    }
                }
            }
            ClientEvent::RecoverySubmitted(email) => match forms::validate_recovery_email(&email) {
                Ok(email) => effects.push(Effect::RememberPassword {
                    email: email.to_string(),
                }),
                Err(notice) => self.notice = Some(notice),
            },
            ClientEvent::RecoveryCompleted(notice) => self.notice = Some(notice),
            ClientEvent::LogoutRequested => {
                if let Some(session) = self.session.take() {
                    info!("Logging out {}", session.user.email);
                    effects.push(Effect::NotifyLogout {
                        token: Some(session.session_id),
                    });
                    effects.push(Effect::ClearSession);
                }
                self.state = WatchdogState::LoggedOut;
                self.login_pending = false;
                self.notice = Some(Notice::success(LOGGED_OUT));
            }
            ClientEvent::TabClosed => {
                self.session = None;
                self.state = WatchdogState::LoggedOut;
                self.login_pending = false;
                self.lookup = None;
                self.notice = None;
                effects.push(Effect::ClearSession);
            }
        }

        let after = self.view();
        if after != before {
            effects.push(Effect::Render(after));
        }
        effects
    }

    fn on_restore(&mut self, stored: Option<ClientSession>, effects: &mut Vec<Effect>) {
        if self.state != WatchdogState::LoggedOut {
            return;
        }
        if let Some(session) = stored {
            debug!("Verifying stored session for {}", session.user.email);
            effects.push(Effect::ProbeStatus {
                email: session.user.email.clone(),
            });
            self.session = Some(session);
            self.state = WatchdogState::Verifying(VerifyReason::Restore);
        }
    }

    fn on_login_submitted(&mut self, email: String, password: String, effects: &mut Vec<Effect>) {
        // One submission at a time, and none while logged in
        if self.login_pending || self.session.is_some() {
            return;
        }
        if let Err(notice) = forms::validate_login(&email, &password) {
            self.notice = Some(notice);
            return;
        }
        self.login_pending = true;
        effects.push(Effect::Login { email, password });
    }

    fn on_login_succeeded(
        &mut self,
        session: ClientSession,
        now: Instant,
        effects: &mut Vec<Effect>,
    ) {
        if !self.login_pending {
            debug!("Ignoring login answer with no submission in flight");
            return;
        }
        self.login_pending = false;
        self.lookup = None;
        self.notice = Some(Notice::welcome(&session.user.email));
        self.state = WatchdogState::Active {
            deadline: now + self.config.idle_timeout,
        };
        effects.push(Effect::PersistSession(session.clone()));
        self.session = Some(session);
    }

    fn on_tick(&mut self, now: Instant, effects: &mut Vec<Effect>) {
        if let WatchdogState::Active { deadline } = self.state {
            if now >= deadline {
                info!("Idle timeout reached, logging out");
                self.force_logout(LogoutReason::Inactivity, effects);
            }
        }

        if self.lookup.as_ref().is_some_and(|l| now >= l.due) {
            if let Some(lookup) = self.lookup.take() {
                effects.push(Effect::FetchAccountStatus {
                    email: lookup.email,
                });
            }
        }
    }

    fn on_visibility(&mut self, visible: bool, effects: &mut Vec<Effect>) {
        self.hidden = !visible;
        match (&self.state, visible) {
            (WatchdogState::Active { .. }, false) => {
                self.state = WatchdogState::Backgrounded;
            }
            (WatchdogState::Active { .. } | WatchdogState::Backgrounded, true) => {
                if let Some(session) = &self.session {
                    effects.push(Effect::ProbeStatus {
                        email: session.user.email.clone(),
                    });
                    self.state = WatchdogState::Verifying(VerifyReason::Visibility);
                }
            }
            _ => {}
        }
    }

    fn on_probe(&mut self, outcome: ProbeOutcome, now: Instant, effects: &mut Vec<Effect>) {
        let WatchdogState::Verifying(reason) = self.state else {
            return;
        };

        match outcome {
            ProbeOutcome::Valid => {
                if let (VerifyReason::Restore, Some(session)) = (reason, &self.session) {
                    self.notice = Some(Notice::welcome(&session.user.email));
                }
                // Hidden again while the probe was in flight: keep the timer paused
                self.state = if self.hidden {
                    WatchdogState::Backgrounded
                } else {
                    WatchdogState::Active {
                        deadline: now + self.config.idle_timeout,
                    }
                };
            }
            ProbeOutcome::Rejected => self.force_logout(LogoutReason::Rejected, effects),
            ProbeOutcome::Unreachable => self.force_logout(LogoutReason::Unreachable, effects),
        }
    }

    /// Drop the local session. The server is only told about idle logouts
    /// when configured to.
    fn force_logout(&mut self, reason: LogoutReason, effects: &mut Vec<Effect>) {
        let session = self.session.take();
        effects.push(Effect::ClearSession);

        if let (LogoutReason::Inactivity, true, Some(session)) =
            (reason, self.config.notify_server_on_expiry, session)
        {
            effects.push(Effect::NotifyLogout {
                token: Some(session.session_id),
            });
        }

        self.state = WatchdogState::LoggedOut;
        self.notice = Some(reason.notice());
    }
}
