//! Automation driver and task executors.
//!
//! Every automated step that enters `running` gets one deferred job: wait for
//! the configured step duration, then complete the step as
//! [`AUTOMATION_ACTOR`]. Jobs are handed to a [`TaskExecutor`] so production
//! code can use tokio while tests drain a [`ManualExecutor`] deterministically.
//!
//! Jobs are detached from the request that caused them. Nothing tracks,
//! dedupes or cancels them once submitted.

use std::{
    collections::VecDeque,
    future::Future,
    pin::Pin,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use log::debug;

use super::Engine;
use crate::models::{Run, StepStatus};

/// Actor recorded on steps completed by the automation driver.
pub const AUTOMATION_ACTOR: &str = "system-automation";

/// Note recorded on steps completed by the automation driver.
pub const AUTOMATION_NOTE: &str = "Completed by automation";

/// A deferred unit of work submitted to an executor.
pub type Job = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Runs deferred jobs.
pub trait TaskExecutor: Send + Sync {
    /// Runs `job` after `delay` without blocking the caller.
    fn spawn(&self, delay: Duration, job: Job);
}

/// Executor backed by the ambient tokio runtime.
///
/// Must be used from within a runtime; each job becomes its own task.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioExecutor;

impl TaskExecutor for TokioExecutor {
    fn spawn(&self, delay: Duration, job: Job) {
        tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            job.await;
        });
    }
}

/// Executor that queues jobs until the owner runs them.
///
/// Delays are recorded but not waited on, which makes automation-driven
/// progress fully deterministic in tests. Queued jobs hold an `Engine` clone
/// that in turn holds this executor, so drain the queue before dropping the
/// engine or both leak.
#[derive(Default)]
pub struct ManualExecutor {
    queue: Mutex<VecDeque<(Duration, Job)>>,
}

impl ManualExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of jobs waiting to run.
    pub fn pending(&self) -> usize {
        self.lock().len()
    }

    /// Delays of the queued jobs, oldest first.
    pub fn delays(&self) -> Vec<Duration> {
        self.lock().iter().map(|(delay, _)| *delay).collect()
    }

    /// Runs the jobs queued at the time of the call, oldest first. Jobs they
    /// submit stay queued. Returns how many jobs ran.
    pub async fn run_pending(&self) -> usize {
        let batch = self.pending();
        for _ in 0..batch {
            // The queue lock must not be held while a job runs: jobs re-enter
            // the engine, which submits follow-up jobs here.
            let next = self.lock().pop_front();
            if let Some((_, job)) = next {
                job.await;
            }
        }
        batch
    }

    /// Runs jobs until the queue is empty. Returns how many jobs ran.
    pub async fn run_until_idle(&self) -> usize {
        let mut total = 0;
        loop {
            let ran = self.run_pending().await;
            if ran == 0 {
                return total;
            }
            total += ran;
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<(Duration, Job)>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TaskExecutor for ManualExecutor {
    fn spawn(&self, delay: Duration, job: Job) {
        self.lock().push_back((delay, job));
    }
}

/// Schedules deferred completions for running automated steps.
pub(crate) struct AutomationDriver {
    executor: Arc<dyn TaskExecutor>,
    step_duration: Duration,
}

impl AutomationDriver {
    pub(crate) fn new(executor: Arc<dyn TaskExecutor>, step_duration: Duration) -> Self {
        Self {
            executor,
            step_duration,
        }
    }

    /// Schedules a completion for every running automated step of `run`.
    pub(crate) fn schedule_run(&self, engine: &Engine, run: &Run) -> usize {
        self.schedule_steps(engine, run, run.steps_with_status(StepStatus::Running))
    }

    /// Schedules a completion for each of `step_ids` that is running and
    /// automated in `run`. Returns how many jobs were submitted.
    pub(crate) fn schedule_steps<I, S>(&self, engine: &Engine, run: &Run, step_ids: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut scheduled = 0;
        for step_id in step_ids {
            let step_id = step_id.as_ref();
            if run.step_status(step_id) != Some(StepStatus::Running) {
                continue;
            }
            let Some(step) = run.plan.step(step_id) else {
                continue;
            };
            if !step.is_automated() {
                continue;
            }

            debug!(
                "scheduling automated completion of step '{}' in run '{}' in {:?}",
                step_id, run.id, self.step_duration
            );
            let engine = engine.clone();
            let run_id = run.id.clone();
            let step_id = step_id.to_string();
            self.executor.spawn(
                self.step_duration,
                Box::pin(async move { engine.complete_automated(run_id, step_id).await }),
            );
            scheduled += 1;
        }
        scheduled
    }
}
