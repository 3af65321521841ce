//! Parameter structures for engine operations.
//!
//! These structures are shared by every interface (stdio adapter, MCP, CLI)
//! and carry only serde derives, plus `JsonSchema` when the `schema` feature is
//! enabled. Interface layers wrap or convert into them:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │ Stdio / MCP     │    │  Core Params    │
//! │  (clap derives) │───▶│ (JSON payloads) │───▶│ (serde only)    │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```
//!
//! Field names are snake_case; camelCase aliases are accepted for hosts that
//! send Go-style payloads.

use std::collections::BTreeMap;

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{PlanFilter, RunFilter, RunStatus};

/// Generic parameters for operations requiring just an identifier.
///
/// Used by `get_plan` and `get_run`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct Id {
    /// The identifier of the plan or run
    pub id: String,
}

impl Id {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// Parameters for querying the plan catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct QueryPlans {
    /// Restrict to these plan identifiers
    #[serde(default)]
    pub ids: Vec<String>,
    /// Case-insensitive text matched against id, title and description
    #[serde(default)]
    pub query: Option<String>,
    /// Tags that must all be present with equal values
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    /// Maximum number of plans to return
    #[serde(default)]
    pub limit: Option<usize>,
}

impl From<&QueryPlans> for PlanFilter {
    fn from(params: &QueryPlans) -> Self {
        Self {
            ids: params.ids.clone(),
            query: params.query.clone(),
            tags: params.tags.clone(),
            limit: params.limit,
        }
    }
}

/// Parameters for querying runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct QueryRuns {
    /// Restrict to runs in one of these statuses
    #[serde(default, alias = "status")]
    pub statuses: Vec<RunStatus>,
    /// Restrict to runs started from one of these plans
    #[serde(default, alias = "planIds")]
    pub plan_ids: Vec<String>,
    /// Scope entries that must all be present with equal values
    #[serde(default)]
    pub scope: BTreeMap<String, String>,
    /// Case-insensitive text matched against run id and plan id
    #[serde(default)]
    pub query: Option<String>,
    /// Plan tags that must all be present with equal values
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    /// Maximum number of runs to return
    #[serde(default)]
    pub limit: Option<usize>,
}

impl From<&QueryRuns> for RunFilter {
    fn from(params: &QueryRuns) -> Self {
        Self {
            statuses: params.statuses.clone(),
            plan_ids: params.plan_ids.clone(),
            scope: params.scope.clone(),
            query: params.query.clone(),
            tags: params.tags.clone(),
            limit: params.limit,
        }
    }
}

/// Parameters for starting a run from a plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct StartRun {
    /// Identifier of the plan to instantiate
    #[serde(alias = "planId")]
    pub plan_id: String,
    /// Scope the run applies to (environment, service, ...)
    #[serde(default)]
    pub scope: BTreeMap<String, String>,
    /// Free-form metadata stored on the run
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
}

impl StartRun {
    /// Parameters for a run with no scope or metadata.
    pub fn new(plan_id: impl Into<String>) -> Self {
        Self {
            plan_id: plan_id.into(),
            ..Default::default()
        }
    }
}

/// Parameters for marking a step of a run as succeeded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct CompleteStep {
    /// Identifier of the run
    #[serde(alias = "runId")]
    pub run_id: String,
    /// Identifier of the step within the run
    #[serde(alias = "stepId")]
    pub step_id: String,
    /// Who completed the step
    #[serde(default)]
    pub actor: String,
    /// Free-text note recorded with the completion
    #[serde(default)]
    pub note: String,
}

impl CompleteStep {
    pub fn new(
        run_id: impl Into<String>,
        step_id: impl Into<String>,
        actor: impl Into<String>,
        note: impl Into<String>,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            step_id: step_id.into(),
            actor: actor.into(),
            note: note.into(),
        }
    }
}
