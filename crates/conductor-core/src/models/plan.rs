//! Plan model definition and related functionality.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ExecutionMode;

/// Metadata key of the deprecated boolean automation flag on steps.
pub const LEGACY_AUTOMATED_KEY: &str = "automated";

/// An immutable template describing a DAG of steps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Plan {
    /// Unique identifier for the plan
    pub id: String,

    /// Title of the plan
    pub title: String,

    /// Detailed multi-line description of the plan
    #[serde(default)]
    pub description: String,

    /// Step definitions in declaration order
    #[serde(default)]
    pub steps: Vec<PlanStep>,

    /// Free-form tags used for filtering
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,

    /// Free-form metadata
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, Value>,

    /// Display URL for the plan in the host platform
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,

    /// Version string of the plan definition
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
}

impl Plan {
    /// Looks up a step definition by its identifier.
    pub fn step(&self, step_id: &str) -> Option<&PlanStep> {
        self.steps.iter().find(|step| step.id == step_id)
    }

    /// Returns true when every `(key, value)` pair appears in the plan's tags.
    pub fn has_tags(&self, tags: &BTreeMap<String, String>) -> bool {
        tags.iter()
            .all(|(key, value)| self.tags.get(key) == Some(value))
    }
}

/// A unit of work within a plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PlanStep {
    /// Identifier, unique within the plan
    pub id: String,

    /// Brief title/summary of the step
    pub title: String,

    /// Detailed description of the step
    #[serde(default)]
    pub description: String,

    /// How the step is driven to completion
    #[serde(default)]
    pub mode: ExecutionMode,

    /// Identifiers of steps in the same plan that must succeed first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,

    /// Free-form metadata
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, Value>,
}

impl PlanStep {
    /// Returns true when the step completes itself.
    pub fn is_automated(&self) -> bool {
        self.mode == ExecutionMode::Automated
    }

    /// Returns true when the step carries the deprecated `automated: true`
    /// metadata flag instead of an explicit mode.
    pub fn has_legacy_automated_flag(&self) -> bool {
        matches!(
            self.metadata.get(LEGACY_AUTOMATED_KEY),
            Some(Value::Bool(true))
        )
    }

    /// Returns true when the step has at least one dependency.
    pub fn has_dependencies(&self) -> bool {
        !self.depends_on.is_empty()
    }

    /// Returns true when `step_id` is among this step's dependencies.
    pub fn depends_on_step(&self, step_id: &str) -> bool {
        self.depends_on.iter().any(|dep| dep == step_id)
    }
}
