//! Run and step state models.

use std::collections::BTreeMap;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Plan, RunStatus, StepStatus};

/// A stateful instantiation of a plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Run {
    /// Engine-generated identifier (`run-NNN`)
    pub id: String,

    /// Identifier of the originating plan
    pub plan_id: String,

    /// Snapshot of the plan taken when the run started
    pub plan: Plan,

    /// One state per snapshot step, in the same order
    pub steps: Vec<StepState>,

    /// Run-level status
    pub status: RunStatus,

    /// Timestamp when the run was started (UTC)
    pub created_at: Timestamp,

    /// Timestamp of the last state change (UTC)
    pub updated_at: Timestamp,

    /// Free-form scope the run applies to (environment, service, ...)
    #[serde(default)]
    pub scope: BTreeMap<String, String>,

    /// Free-form metadata
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
}

impl Run {
    /// Looks up the state of a step by identifier.
    pub fn step_state(&self, step_id: &str) -> Option<&StepState> {
        self.steps.iter().find(|state| state.step_id == step_id)
    }

    pub(crate) fn step_state_mut(&mut self, step_id: &str) -> Option<&mut StepState> {
        self.steps.iter_mut().find(|state| state.step_id == step_id)
    }

    /// Status of a step, if the step exists in this run.
    pub fn step_status(&self, step_id: &str) -> Option<StepStatus> {
        self.step_state(step_id).map(|state| state.status)
    }

    /// Returns true when every step has succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.steps
            .iter()
            .all(|state| state.status == StepStatus::Succeeded)
    }

    /// Derives the run status from the current step states.
    pub fn derive_status(&self) -> RunStatus {
        if self.all_succeeded() {
            RunStatus::Completed
        } else if self.steps.iter().any(|state| {
            matches!(state.status, StepStatus::Running | StepStatus::Succeeded)
        }) {
            RunStatus::Running
        } else {
            RunStatus::Created
        }
    }

    /// Identifiers of the steps currently in the given status.
    pub fn steps_with_status(&self, status: StepStatus) -> Vec<&str> {
        self.steps
            .iter()
            .filter(|state| state.status == status)
            .map(|state| state.step_id.as_str())
            .collect()
    }
}

/// Progress of a single step within a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StepState {
    /// Identifier of the step definition in the run's plan snapshot
    pub step_id: String,

    /// Current status of the step
    pub status: StepStatus,

    /// Who or what completed the step
    #[serde(default)]
    pub actor: String,

    /// Free-text note recorded on completion
    #[serde(default)]
    pub note: String,

    /// When the step started running (automated steps only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<Timestamp>,

    /// When the step succeeded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<Timestamp>,

    /// When the state last changed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl StepState {
    /// Creates an untouched state for the given step.
    pub fn new(step_id: impl Into<String>, status: StepStatus) -> Self {
        Self {
            step_id: step_id.into(),
            status,
            actor: String::new(),
            note: String::new(),
            started_at: None,
            finished_at: None,
            updated_at: None,
        }
    }
}
