//! Delayed UI actions (the simulated "refresh" and "analysis" runs).
//!
//! A task moves `Idle -> Pending -> {Resolved, Cancelled}` and never leaves a
//! final state. A cancelled task never runs its callback, so state owned by a
//! screen that went away is left untouched.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::DashboardConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    #[default]
    Idle,
    Pending,
    Resolved,
    Cancelled,
}

impl TaskState {
    pub fn start(self) -> Self {
        match self {
            TaskState::Idle => TaskState::Pending,
            other => other,
        }
    }

    pub fn resolve(self) -> Self {
        match self {
            TaskState::Pending => TaskState::Resolved,
            other => other,
        }
    }

    pub fn cancel(self) -> Self {
        match self {
            TaskState::Pending => TaskState::Cancelled,
            other => other,
        }
    }

    pub fn is_busy(self) -> bool {
        self == TaskState::Pending
    }

    pub fn is_final(self) -> bool {
        matches!(self, TaskState::Resolved | TaskState::Cancelled)
    }
}

/// A callback armed on a tokio timer.
#[derive(Debug)]
pub struct ScheduledTask {
    label: String,
    state: Arc<Mutex<TaskState>>,
    handle: JoinHandle<()>,
}

/// Arms `on_resolve` to run once `delay` has elapsed.
///
/// Must be called from within a tokio runtime.
pub fn schedule<F>(label: impl Into<String>, delay: Duration, on_resolve: F) -> ScheduledTask
where
    F: FnOnce() + Send + 'static,
{
    let label = label.into();
    let state = Arc::new(Mutex::new(TaskState::Idle.start()));
    debug!(task = %label, delay_ms = delay.as_millis() as u64, "task pending");

    let handle = {
        let state = Arc::clone(&state);
        let label = label.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let fired = {
                let mut guard = state.lock().unwrap_or_else(PoisonError::into_inner);
                let was_pending = guard.is_busy();
                *guard = guard.resolve();
                was_pending
            };
            if fired {
                info!(task = %label, "task resolved");
                on_resolve();
            }
        })
    };

    ScheduledTask {
        label,
        state,
        handle,
    }
}

impl ScheduledTask {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn state(&self) -> TaskState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cancels a pending task. Returns `false` if it had already resolved.
    pub fn cancel(&self) -> bool {
        let cancelled = {
            let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            let was_pending = guard.is_busy();
            *guard = guard.cancel();
            was_pending
        };
        if cancelled {
            self.handle.abort();
            info!(task = %self.label, "task cancelled");
        }
        cancelled
    }

    /// Waits for the timer to finish (or be aborted) and reports the final state.
    pub async fn join(self) -> TaskState {
        let state = Arc::clone(&self.state);
        // An aborted timer surfaces as a cancelled JoinError; the state already says so.
        let _ = self.handle.await;
        let final_state = *state.lock().unwrap_or_else(PoisonError::into_inner);
        final_state
    }
}

/// The simulated actions the screens can start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MockAction {
    Refresh,
    Analysis,
}

/// What the user sees once a mock action resolves. Mock actions always succeed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: &'static str,
    pub message: &'static str,
}

impl MockAction {
    pub fn label(self) -> &'static str {
        match self {
            MockAction::Refresh => "refresh",
            MockAction::Analysis => "analysis",
        }
    }

    pub fn delay(self, config: &DashboardConfig) -> Duration {
        match self {
            MockAction::Refresh => Duration::from_millis(config.refresh_delay_ms),
            MockAction::Analysis => Duration::from_millis(config.analysis_delay_ms),
        }
    }

    pub fn completion_notice(self) -> Notice {
        match self {
            MockAction::Refresh => Notice {
                title: "Success",
                message: "Data refreshed successfully",
            },
            MockAction::Analysis => Notice {
                title: "Analysis Complete",
                message: "New AI insights have been generated based on latest data.",
            },
        }
    }

    /// Schedules the action with its configured delay.
    pub fn start<F>(self, config: &DashboardConfig, on_resolve: F) -> ScheduledTask
    where
        F: FnOnce() + Send + 'static,
    {
        schedule(self.label(), self.delay(config), on_resolve)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;

    #[test]
    fn transitions_only_leave_pending_once() {
        assert_eq!(TaskState::Idle.start(), TaskState::Pending);
        assert_eq!(TaskState::Pending.resolve(), TaskState::Resolved);
        assert_eq!(TaskState::Pending.cancel(), TaskState::Cancelled);
        assert_eq!(TaskState::Resolved.cancel(), TaskState::Resolved);
        assert_eq!(TaskState::Cancelled.resolve(), TaskState::Cancelled);
        assert_eq!(TaskState::Idle.resolve(), TaskState::Idle);
        assert_eq!(TaskState::Resolved.start(), TaskState::Resolved);
        assert!(TaskState::Cancelled.is_final());
        assert!(!TaskState::Pending.is_final());
    }

    #[tokio::test(start_paused = true)]
    async fn pending_task_resolves_after_delay() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);
        let task = schedule("refresh", Duration::from_secs(2), move || {
            flag.store(true, Ordering::SeqCst);
        });
        assert_eq!(task.state(), TaskState::Pending);

        assert_eq!(task.join().await, TaskState::Resolved);
        assert!(fired.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_task_never_runs_its_callback() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);
        let task = schedule("analysis", Duration::from_secs(3), move || {
            flag.store(true, Ordering::SeqCst);
        });

        assert!(task.cancel());
        assert!(!task.cancel());
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(task.state(), TaskState::Cancelled);
        assert_eq!(task.join().await, TaskState::Cancelled);
        assert!(!fired.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_after_resolution_is_refused() {
        let task = schedule("refresh", Duration::from_millis(10), || {});
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(task.state(), TaskState::Resolved);
        assert!(!task.cancel());
        assert_eq!(task.join().await, TaskState::Resolved);
    }

    #[tokio::test(start_paused = true)]
    async fn mock_actions_use_configured_delays() {
        let config = DashboardConfig::default();
        assert_eq!(MockAction::Refresh.delay(&config), Duration::from_millis(2_000));
        assert_eq!(MockAction::Analysis.delay(&config), Duration::from_millis(3_000));

        let task = MockAction::Refresh.start(&config, || {});
        assert_eq!(task.label(), "refresh");
        assert_eq!(task.join().await, TaskState::Resolved);
        assert_eq!(
            MockAction::Refresh.completion_notice().message,
            "Data refreshed successfully"
        );
    }
}
