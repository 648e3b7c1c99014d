//! Cancellable, debounced task scheduling.
//!
//! A [`Debouncer`] keeps at most one *pending* task (sleeping until its
//! delay elapses) and at most one *in-flight* task (running). Scheduling a
//! new task aborts the pending one. When the delay elapses while a previous
//! run is still in flight, the new task is parked and runs as soon as the
//! in-flight one finishes; a later park replaces an earlier one.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;

type Task = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

#[derive(Default)]
struct Runner {
    in_flight: bool,
    trailing: Option<Task>,
}

fn lock_runner(runner: &Mutex<Runner>) -> MutexGuard<'_, Runner> {
    runner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
    runner: Arc<Mutex<Runner>>,
}

/// Releases the runner if the in-flight task panics or is aborted.
struct InFlightGuard {
    runner: Arc<Mutex<Runner>>,
    armed: bool,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if self.armed {
            let mut runner = lock_runner(&self.runner);
            runner.in_flight = false;
            runner.trailing = None;
        }
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
            runner: Arc::new(Mutex::new(Runner::default())),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arms `task` to run after the debounce delay, replacing any pending task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut pending = self.lock_pending();
        if let Some(previous) = pending.take() {
            previous.abort();
        }

        let delay = self.delay;
        let runner = Arc::clone(&self.runner);

        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            {
                let mut state = lock_runner(&runner);
                if state.in_flight {
                    tracing::debug!("debounced task parked: previous run still in flight");
                    state.trailing = Some(Box::pin(task));
                    return;
                }
                state.in_flight = true;
            }

            // Detached so that re-scheduling never aborts a run that already started.
            tokio::spawn(run_in_flight(runner, Box::pin(task)));
        }));
    }

    /// Aborts the pending task and drops any parked one. A task already in
    /// flight keeps running.
    pub fn cancel(&self) {
        if let Some(previous) = self.lock_pending().take() {
            previous.abort();
        }
        lock_runner(&self.runner).trailing = None;
    }

    pub fn is_pending(&self) -> bool {
        self.lock_pending()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn is_in_flight(&self) -> bool {
        lock_runner(&self.runner).in_flight
    }

    fn lock_pending(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

async fn run_in_flight(runner: Arc<Mutex<Runner>>, first: Task) {
    let mut guard = InFlightGuard {
        runner: Arc::clone(&runner),
        armed: true,
    };
    let mut next = Some(first);
    while let Some(task) = next {
        task.await;
        {
            let mut state = lock_runner(&runner);
            next = state.trailing.take();
            if next.is_none() {
                state.in_flight = false;
                guard.armed = false;
            }
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
