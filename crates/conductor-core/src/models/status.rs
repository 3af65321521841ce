//! Status and mode enumerations for plans, runs and steps.

use std::str::FromStr;

#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How a step is driven to completion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// Requires an explicit external completion
    #[default]
    Manual,

    /// Completes itself after the configured step duration
    Automated,
}

impl FromStr for ExecutionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "manual" => Ok(ExecutionMode::Manual),
            "automated" | "auto" => Ok(ExecutionMode::Automated),
            _ => Err(format!("Invalid execution mode: {s}")),
        }
    }
}

impl ExecutionMode {
    /// Wire representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Manual => "manual",
            ExecutionMode::Automated => "automated",
        }
    }
}

/// Type-safe enumeration of step states within a run.
///
/// Variants are declared in progression order, so the derived ordering can be
/// used to check that a step never moves backwards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Waiting on at least one dependency
    Pending,

    /// Manual step whose dependencies have all succeeded
    Ready,

    /// Automated step whose completion has been scheduled
    Running,

    /// Step has completed
    Succeeded,
}

impl FromStr for StepStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(StepStatus::Pending),
            "ready" => Ok(StepStatus::Ready),
            "running" => Ok(StepStatus::Running),
            "succeeded" => Ok(StepStatus::Succeeded),
            _ => Err(format!("Invalid step status: {s}")),
        }
    }
}

impl StepStatus {
    /// Wire representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::Ready => "ready",
            StepStatus::Running => "running",
            StepStatus::Succeeded => "succeeded",
        }
    }

    /// Position in the pending → ready/running → succeeded progression.
    ///
    /// Ready and running share a rank: a step takes exactly one of them.
    pub fn rank(&self) -> u8 {
        match self {
            StepStatus::Pending => 0,
            StepStatus::Ready | StepStatus::Running => 1,
            StepStatus::Succeeded => 2,
        }
    }

    /// Get status with consistent icon formatting for display.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use conductor_core::models::StepStatus;
    ///
    /// assert_eq!(StepStatus::Succeeded.with_icon(), "✓ Succeeded");
    /// assert_eq!(StepStatus::Pending.with_icon(), "○ Pending");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            StepStatus::Pending => "○ Pending",
            StepStatus::Ready => "◎ Ready",
            StepStatus::Running => "➤ Running",
            StepStatus::Succeeded => "✓ Succeeded",
        }
    }
}

/// Type-safe enumeration of run statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// No step has started or finished yet
    #[default]
    Created,

    /// At least one step is running or has succeeded
    Running,

    /// Every step has succeeded
    Completed,
}

impl FromStr for RunStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "created" => Ok(RunStatus::Created),
            "running" => Ok(RunStatus::Running),
            "completed" => Ok(RunStatus::Completed),
            _ => Err(format!("Invalid run status: {s}")),
        }
    }
}

impl RunStatus {
    /// Wire representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Created => "created",
            RunStatus::Running => "running",
            RunStatus::Completed => "completed",
        }
    }
}
