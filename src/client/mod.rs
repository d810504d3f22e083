//! Portal client: backend API, local session storage and the
//! inactivity/session watchdog

pub mod api;
pub mod forms;
pub mod machine;
pub mod runner;
pub mod storage;
pub mod view;

pub use api::{ApiFailure, ClientSession, HttpPortal, PortalApi, ProbeOutcome};
pub use machine::{ActivityKind, ClientEvent, Effect, Watchdog, WatchdogConfig, WatchdogState};
pub use runner::{spawn_watchdog, WatchdogHandle};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
pub use view::{Notice, NoticeKind, View};
