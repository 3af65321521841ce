//! Run summary types and functionality.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Run, RunStatus, StepStatus};

/// Summary information about a run with step statistics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSummary {
    /// Run ID
    pub id: String,
    /// Originating plan ID
    pub plan_id: String,
    /// Title of the plan snapshot
    pub title: String,
    /// Run status
    pub status: RunStatus,
    /// Creation timestamp
    pub created_at: Timestamp,
    /// Last update timestamp
    pub updated_at: Timestamp,
    /// Total number of steps
    pub total_steps: u32,
    /// Steps waiting on dependencies
    pub pending_steps: u32,
    /// Manual steps awaiting completion
    pub ready_steps: u32,
    /// Automated steps in flight
    pub running_steps: u32,
    /// Steps that have succeeded
    pub succeeded_steps: u32,
}

impl From<&Run> for RunSummary {
    fn from(run: &Run) -> Self {
        let count = |status: StepStatus| {
            run.steps
                .iter()
                .filter(|state| state.status == status)
                .count() as u32
        };

        Self {
            id: run.id.clone(),
            plan_id: run.plan_id.clone(),
            title: run.plan.title.clone(),
            status: run.status,
            created_at: run.created_at,
            updated_at: run.updated_at,
            total_steps: run.steps.len() as u32,
            pending_steps: count(StepStatus::Pending),
            ready_steps: count(StepStatus::Ready),
            running_steps: count(StepStatus::Running),
            succeeded_steps: count(StepStatus::Succeeded),
        }
    }
}
