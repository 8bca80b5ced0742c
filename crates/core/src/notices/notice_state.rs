//! Transient operation status and its auto-clear timer.

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::sleep;

/// Default delay before a success/error message clears itself.
pub const DEFAULT_NOTICE_DELAY_MS: u64 = 3_000;

/// Outcome of the last user-initiated operation on a screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum OperationState {
    #[default]
    Idle,
    Pending,
    Succeeded(String),
    Failed(String),
}

impl OperationState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Message to display, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Succeeded(message) | Self::Failed(message) => Some(message),
            Self::Idle | Self::Pending => None,
        }
    }
}

/// Cancellable one-shot timer. Dropping it aborts the pending task.
#[derive(Debug, Default)]
pub struct NoticeTimer {
    handle: Option<JoinHandle<()>>,
}

impl NoticeTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `on_elapsed` after `delay`, replacing any timer already scheduled.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, delay: Duration, on_elapsed: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        self.handle = Some(tokio::spawn(async move {
            sleep(delay).await;
            on_elapsed();
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            if !handle.is_finished() {
                debug!("Cancelling pending notice timer");
            }
            handle.abort();
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for NoticeTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Operation status shown to the user, cleared back to idle after a delay.
///
/// Observers can [`subscribe`](Self::subscribe) to render every transition.
#[derive(Debug)]
pub struct TransientNotice {
    state: Arc<watch::Sender<OperationState>>,
    timer: NoticeTimer,
    delay: Duration,
}

impl TransientNotice {
    pub fn new(delay: Duration) -> Self {
        let (tx, _rx) = watch::channel(OperationState::Idle);
        Self {
            state: Arc::new(tx),
            timer: NoticeTimer::new(),
            delay,
        }
    }

    pub fn current(&self) -> OperationState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<OperationState> {
        self.state.subscribe()
    }

    /// Mark an operation as in flight. Supersedes any pending auto-clear.
    pub fn pending(&mut self) {
        self.timer.cancel();
        self.state.send_replace(OperationState::Pending);
    }

    /// Show a final state; it clears to idle after the delay.
    pub fn show(&mut self, state: OperationState) {
        self.show_then(state, || {});
    }

    /// Show a final state, clear it after the delay, then run `after_clear`.
    pub fn show_then<F>(&mut self, state: OperationState, after_clear: F)
    where
        F: FnOnce() + Send + 'static,
    {
        debug!("Notice: {:?}", state);
        self.state.send_replace(state);
        let sender = Arc::clone(&self.state);
        self.timer.schedule(self.delay, move || {
            sender.send_replace(OperationState::Idle);
            after_clear();
        });
    }

    /// Reset to idle immediately and drop any pending auto-clear.
    pub fn clear(&mut self) {
        self.timer.cancel();
        self.state.send_replace(OperationState::Idle);
    }

    /// Stop the auto-clear timer without touching the current state.
    pub fn cancel_timer(&mut self) {
        self.timer.cancel();
    }

    pub fn is_clear_scheduled(&self) -> bool {
        self.timer.is_scheduled()
    }
}

impl Default for TransientNotice {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_NOTICE_DELAY_MS))
    }
}
