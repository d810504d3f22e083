//! Authentication, lockout and session management

pub mod directory;
pub mod middleware;
pub mod models;
pub mod service;
pub mod session;

/// Wrong passwords allowed before an account locks
pub const MAX_LOGIN_ATTEMPTS: u32 = 3;

pub use directory::AccountDirectory;
pub use middleware::{session_token, track_activity, SessionToken, SESSION_HEADER};
pub use models::{
    demo_accounts, Account, AccountRole, AccountStatus, LoginRequest, LoginResponse,
    PublicAccount,
};
pub use service::{AuthService, LoginOutcome};
pub use session::{Session, SessionStore};
