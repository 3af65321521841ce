//! Run lifecycle operations for the Engine.

use jiff::Timestamp;
use log::{debug, info, warn};
use serde_json::Value;

use super::{
    automation::{AUTOMATION_ACTOR, AUTOMATION_NOTE},
    resolver, Engine,
};
use crate::{
    error::{EngineError, Result},
    models::{Run, RunStatus, StepStatus},
    params::{CompleteStep, StartRun},
};

/// Metadata key receiving the engine's source label.
const SOURCE_METADATA_KEY: &str = "source";

impl Engine {
    /// Starts a new run of the given plan.
    ///
    /// Steps without dependencies are activated immediately and automated
    /// ones are scheduled for deferred completion before this returns.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::PlanNotFound` if the catalog has no such plan.
    pub async fn start_run(&self, params: &StartRun) -> Result<Run> {
        let mut store = self.inner.store.lock().await;

        let plan = self
            .inner
            .catalog
            .get(&params.plan_id)
            .ok_or_else(|| EngineError::PlanNotFound {
                id: params.plan_id.clone(),
            })?;

        let now = Timestamp::now();
        let steps = resolver::initial_states(plan, now);
        let status = if steps.iter().any(|s| s.status == StepStatus::Running) {
            RunStatus::Running
        } else {
            RunStatus::Created
        };

        let mut metadata = params.metadata.clone();
        metadata
            .entry(SOURCE_METADATA_KEY.to_string())
            .or_insert_with(|| Value::String(self.inner.config.source.clone()));

        let run = Run {
            id: store.next_run_id(),
            plan_id: plan.id.clone(),
            plan: plan.clone(),
            steps,
            status,
            created_at: now,
            updated_at: now,
            scope: params.scope.clone(),
            metadata,
        };
        info!("started run '{}' of plan '{}'", run.id, run.plan_id);

        let snapshot = run.clone();
        store.insert(run);
        self.inner.driver.schedule_run(self, &snapshot);

        Ok(snapshot)
    }

    /// Marks a step of a run as succeeded and unblocks its dependents.
    ///
    /// A step may be completed from any status other than `succeeded`,
    /// including `pending`. Returns the updated run.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::RunNotFound` or `EngineError::StepNotFound` for
    /// unknown identifiers, and `EngineError::StepAlreadySucceeded` when the
    /// step was completed before.
    pub async fn complete_step(&self, params: &CompleteStep) -> Result<Run> {
        debug!(
            "complete_step: run '{}' step '{}' by '{}'",
            params.run_id, params.step_id, params.actor
        );
        let mut store = self.inner.store.lock().await;

        let run = store
            .get_mut(&params.run_id)
            .ok_or_else(|| EngineError::RunNotFound {
                id: params.run_id.clone(),
            })?;

        let now = Timestamp::now();
        let state = run
            .step_state_mut(&params.step_id)
            .ok_or_else(|| EngineError::StepNotFound {
                run_id: params.run_id.clone(),
                step_id: params.step_id.clone(),
            })?;
        if state.status == StepStatus::Succeeded {
            return Err(EngineError::StepAlreadySucceeded {
                run_id: params.run_id.clone(),
                step_id: params.step_id.clone(),
            });
        }

        state.status = StepStatus::Succeeded;
        state.actor = params.actor.clone();
        state.note = params.note.clone();
        state.finished_at = Some(now);
        state.updated_at = Some(now);

        let activated = resolver::propagate(run, &params.step_id, now);
        run.status = run.derive_status();
        run.updated_at = now;
        if run.status == RunStatus::Completed {
            info!("run '{}' completed", run.id);
        }

        let snapshot = run.clone();
        self.inner
            .driver
            .schedule_steps(self, &snapshot, &activated);

        Ok(snapshot)
    }

    /// Completion path used by automation jobs. Failures never reach a
    /// caller, so they are logged here.
    pub(crate) async fn complete_automated(&self, run_id: String, step_id: String) {
        let params = CompleteStep::new(run_id, step_id, AUTOMATION_ACTOR, AUTOMATION_NOTE);
        match self.complete_step(&params).await {
            Ok(run) => debug!(
                "automation completed step '{}' in run '{}' (run {})",
                params.step_id,
                run.id,
                run.status.as_str()
            ),
            Err(EngineError::StepAlreadySucceeded { .. }) => debug!(
                "automation skipped step '{}' in run '{}': already succeeded",
                params.step_id, params.run_id
            ),
            Err(e) => warn!(
                "automated completion of step '{}' in run '{}' failed: {e}",
                params.step_id, params.run_id
            ),
        }
    }
}
