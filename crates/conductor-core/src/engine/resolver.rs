//! Dependency resolution for step readiness.
//!
//! Pure functions over a plan snapshot and a run's step states. The
//! coordinator calls [`propagate`] once per completion event; only the
//! immediate dependents of the completed step are examined.

use jiff::Timestamp;

use crate::models::{Plan, PlanStep, Run, StepState, StepStatus};

/// Status a step takes once all of its dependencies have succeeded.
fn activated_status(step: &PlanStep) -> StepStatus {
    if step.is_automated() {
        StepStatus::Running
    } else {
        StepStatus::Ready
    }
}

/// Builds the initial step states for a new run of `plan`.
///
/// Steps without dependencies are activated immediately (manual steps become
/// `ready`, automated steps `running` with `started_at = now`); every other
/// step starts `pending`.
pub fn initial_states(plan: &Plan, now: Timestamp) -> Vec<StepState> {
    plan.steps
        .iter()
        .map(|step| {
            if step.has_dependencies() {
                return StepState::new(step.id.clone(), StepStatus::Pending);
            }
            let mut state = StepState::new(step.id.clone(), activated_status(step));
            if state.status == StepStatus::Running {
                state.started_at = Some(now);
            }
            state.updated_at = Some(now);
            state
        })
        .collect()
}

/// Returns true when every dependency of `step` has succeeded in `run`.
pub fn dependencies_satisfied(run: &Run, step: &PlanStep) -> bool {
    step.depends_on
        .iter()
        .all(|dep| run.step_status(dep) == Some(StepStatus::Succeeded))
}

/// Unblocks the pending dependents of `completed_step_id` whose dependencies
/// have now all succeeded.
///
/// Returns the identifiers of the steps that were activated, in plan order.
pub fn propagate(run: &mut Run, completed_step_id: &str, now: Timestamp) -> Vec<String> {
    let unblocked: Vec<(String, StepStatus)> = run
        .plan
        .steps
        .iter()
        .filter(|step| step.depends_on_step(completed_step_id))
        .filter(|step| run.step_status(&step.id) == Some(StepStatus::Pending))
        .filter(|step| dependencies_satisfied(run, step))
        .map(|step| (step.id.clone(), activated_status(step)))
        .collect();

    for (step_id, status) in &unblocked {
        if let Some(state) = run.step_state_mut(step_id) {
            state.status = *status;
            if *status == StepStatus::Running {
                state.started_at = Some(now);
            }
            state.updated_at = Some(now);
        }
    }

    unblocked.into_iter().map(|(step_id, _)| step_id).collect()
}
