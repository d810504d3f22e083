//! Tokio driver for the watchdog
//!
//! One task owns the [`Watchdog`]. Outside input arrives on an mpsc
//! channel, API calls run in their own tasks and post their answers back
//! on an internal channel, and every rendered view is published on a
//! `watch` channel.

use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep_until, Instant, MissedTickBehavior};
use tracing::debug;

use super::api::{ApiFailure, PortalApi, ProbeOutcome};
use super::forms::{self, CONNECTION_ERROR};
use super::machine::{ClientEvent, Effect, Watchdog, WatchdogConfig};
use super::storage::SessionStorage;
use super::view::View;

/// Handle to a running watchdog
pub struct WatchdogHandle {
    events: mpsc::Sender<ClientEvent>,
    views: watch::Receiver<View>,
    task: JoinHandle<()>,
}

impl WatchdogHandle {
    /// Feed an event; fails only once the driver has stopped
    pub async fn send(&self, event: ClientEvent) -> bool {
        self.events.send(event).await.is_ok()
    }

    pub fn sender(&self) -> mpsc::Sender<ClientEvent> {
        self.events.clone()
    }

    pub fn views(&self) -> watch::Receiver<View> {
        self.views.clone()
    }

    pub fn current_view(&self) -> View {
        self.views.borrow().clone()
    }

    /// Close the input channel and wait for the driver to finish
    pub async fn shutdown(self) {
        drop(self.events);
        let _ = self.task.await;
    }
}

/// Start a watchdog, restoring any session found in `storage`
pub fn spawn_watchdog<A, S>(api: Arc<A>, storage: S, config: WatchdogConfig) -> WatchdogHandle
where
    A: PortalApi + 'static,
    S: SessionStorage + 'static,
{
    let (events_tx, events_rx) = mpsc::channel(64);
    let machine = Watchdog::new(config);
    let (views_tx, views_rx) = watch::channel(machine.view());

    let driver = Driver {
        machine,
        api,
        storage,
        views: views_tx,
    };
    let task = tokio::spawn(driver.run(events_rx));

    WatchdogHandle {
        events: events_tx,
        views: views_rx,
        task,
    }
}

struct Driver<A, S> {
    machine: Watchdog,
    api: Arc<A>,
    storage: S,
    views: watch::Sender<View>,
}

impl<A, S> Driver<A, S>
where
    A: PortalApi + 'static,
    S: SessionStorage + 'static,
{
    async fn run(mut self, mut events: mpsc::Receiver<ClientEvent>) {
        let (done_tx, mut done_rx) = mpsc::channel(64);

        let restored = self.storage.load();
        self.dispatch(ClientEvent::Restore(restored), &done_tx);

        let period = self.machine.config().monitor_interval;
        let mut monitor = interval_at(Instant::now() + period, period);
        monitor.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            let deadline = self.machine.next_deadline();

            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.dispatch(event, &done_tx),
                    None => break,
                },
                Some(event) = done_rx.recv() => self.dispatch(event, &done_tx),
                _ = sleep_until_opt(deadline) => self.dispatch(ClientEvent::Tick, &done_tx),
                _ = monitor.tick() => self.dispatch(ClientEvent::MonitorTick, &done_tx),
            }
        }

        debug!("Watchdog driver stopped");
    }

    fn dispatch(&mut self, event: ClientEvent, done: &mpsc::Sender<ClientEvent>) {
        for effect in self.machine.handle(event, Instant::now()) {
            self.execute(effect, done);
        }
    }

    fn execute(&mut self, effect: Effect, done: &mpsc::Sender<ClientEvent>) {
        match effect {
            Effect::Render(view) => {
                self.views.send_replace(view);
            }
            Effect::PersistSession(session) => self.storage.save(&session),
            Effect::ClearSession => self.storage.clear(),
            Effect::Login { email, password } => {
                self.spawn_call(done, move |api| async move {
                    match api.login(&email, &password).await {
                        Ok(session) => ClientEvent::LoginSucceeded(session),
                        Err(ApiFailure::Rejected { message, .. }) => ClientEvent::LoginFailed(message),
                        Err(ApiFailure::Unreachable(_)) => {
                            ClientEvent::LoginFailed(CONNECTION_ERROR.to_string())
                        }
                    }
                });
            }
            Effect::ProbeStatus { email } => {
                self.spawn_call(done, move |api| async move {
                    let result = api.account_status(&email).await;
                    ClientEvent::ProbeCompleted(ProbeOutcome::from(&result))
                });
            }
            Effect::CheckSession { token } => {
                self.spawn_call(done, move |api| async move {
                    let result = api.check_session(&token).await;
                    ClientEvent::SessionChecked {
                        outcome: ProbeOutcome::from(&result),
                        token,
                    }
                });
            }
            Effect::FetchAccountStatus { email } => {
                let api = self.api.clone();
                let done = done.clone();
                tokio::spawn(async move {
                    // Lookup failures are silent; they only cost a warning
                    if let Ok(status) = api.account_status(&email).await {
                        let _ = done.send(ClientEvent::AccountStatusFetched(status)).await;
                    }
                });
            }
            Effect::RememberPassword { email } => {
                self.spawn_call(done, move |api| async move {
                    let result = api.remember_password(&email).await;
                    ClientEvent::RecoveryCompleted(forms::recovery_notice(&result))
                });
            }
            Effect::NotifyLogout { token } => {
                let api = self.api.clone();
                tokio::spawn(async move {
                    if let Err(e) = api.logout(token.as_deref()).await {
                        debug!("Server logout failed: {}", e);
                    }
                });
            }
        }
    }

    /// Run an API call off the driver task and post its result back
    fn spawn_call<F, Fut>(&self, done: &mpsc::Sender<ClientEvent>, call: F)
    where
        F: FnOnce(Arc<A>) -> Fut + Send + 'static,
        Fut: std::future::Future<Output = ClientEvent> + Send + 'static,
    {
        let api = self.api.clone();
        let done = done.clone();
        tokio::spawn(async move {
            let event = call(api).await;
            let _ = done.send(event).await;
        });
    }
}

async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
