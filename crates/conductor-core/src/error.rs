//! Error types for the run engine.

use std::path::PathBuf;

use thiserror::Error;

/// Comprehensive error type for all engine operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// No plan with the given identifier exists in the catalog
    #[error("Plan '{id}' not found")]
    PlanNotFound { id: String },
    /// No run with the given identifier exists in the store
    #[error("Run '{id}' not found")]
    RunNotFound { id: String },
    /// The run exists but has no step with the given identifier
    #[error("Step '{step_id}' not found in run '{run_id}'")]
    StepNotFound { run_id: String, step_id: String },
    /// The step was already completed; completions are not re-applied
    #[error("Step '{step_id}' in run '{run_id}' has already succeeded")]
    StepAlreadySucceeded { run_id: String, step_id: String },
    /// A plan failed catalog validation
    #[error("Invalid plan '{plan_id}': {reason}")]
    InvalidPlan { plan_id: String, reason: String },
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> EngineError {
        EngineError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

/// Builder for plan validation errors raised while assembling a catalog.
pub struct InvalidPlanBuilder {
    plan_id: String,
}

impl InvalidPlanBuilder {
    /// Create a new builder for the plan with the given identifier.
    pub fn new(plan_id: impl Into<String>) -> Self {
        Self {
            plan_id: plan_id.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> EngineError {
        EngineError::InvalidPlan {
            plan_id: self.plan_id,
            reason: reason.into(),
        }
    }
}

impl EngineError {
    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Creates a builder for plan validation errors.
    pub fn invalid_plan(plan_id: impl Into<String>) -> InvalidPlanBuilder {
        InvalidPlanBuilder::new(plan_id)
    }

    /// Stable machine-readable code used on the wire.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::PlanNotFound { .. }
            | EngineError::RunNotFound { .. }
            | EngineError::StepNotFound { .. } => "not_found",
            EngineError::StepAlreadySucceeded { .. } => "conflict",
            EngineError::InvalidPlan { .. } => "invalid_plan",
            EngineError::InvalidInput { .. } | EngineError::Serialization { .. } => {
                "invalid_request"
            }
            EngineError::FileSystem { .. } | EngineError::Configuration { .. } => "internal",
        }
    }

    /// Returns true for any of the not-found variants.
    pub fn is_not_found(&self) -> bool {
        self.code() == "not_found"
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
