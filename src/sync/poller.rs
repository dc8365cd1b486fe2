//! Poller
//!
//! Background task that keeps rooms and messages fresh while a session
//! exists: one room refresh right away, then a message refresh and a room
//! refresh together on every tick. The task ends by itself once the session
//! is gone or its teardown has begun.

use super::SyncCore;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub struct Poller {
    core: Arc<SyncCore>,
    interval: Duration,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Poller {
    pub fn new(core: Arc<SyncCore>, interval: Duration) -> Self {
        Self {
            core,
            interval,
            handle: Mutex::new(None),
        }
    }

    /// Start polling. Does nothing if already running.
    pub fn start(&self) {
        let mut handle = self.handle.lock().unwrap_or_else(|p| p.into_inner());
        if handle.as_ref().is_some_and(|h| !h.is_finished()) {
            return;
        }

        tracing::info!(interval_ms = self.interval.as_millis() as u64, "Starting poller");
        let core = self.core.clone();
        let interval = self.interval;
        *handle = Some(tokio::spawn(run(core, interval)));
    }

    /// Stop polling. In-flight refreshes are dropped with the task.
    pub fn stop(&self) {
        if let Some(handle) = self.handle.lock().unwrap_or_else(|p| p.into_inner()).take() {
            handle.abort();
            tracing::info!("Poller stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run(core: Arc<SyncCore>, interval: Duration) {
    if let Err(e) = core.refresh_rooms().await {
        tracing::warn!(error = %e, "Initial room refresh failed");
    }
    if !core.session_active().await {
        tracing::info!("Session ended, poller exiting");
        return;
    }

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // Skip the first immediate tick
    ticker.tick().await;

    loop {
        ticker.tick().await;
        if !core.session_active().await {
            break;
        }

        tracing::trace!("Poll tick");
        let (messages, rooms) = tokio::join!(core.refresh_messages(), core.refresh_rooms());
        if let Err(e) = messages {
            tracing::warn!(error = %e, "Message refresh failed");
        }
        if let Err(e) = rooms {
            tracing::warn!(error = %e, "Room refresh failed");
        }
        if !core.session_active().await {
            break;
        }
    }
    tracing::info!("Session ended, poller exiting");
}
