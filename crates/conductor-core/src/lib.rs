//! Core library for the Conductor orchestration engine.
//!
//! This crate instantiates runs from DAG-shaped plan templates and tracks each
//! step of a run through `pending → ready | running → succeeded`. Manual steps
//! wait for an external actor; automated steps complete themselves after a
//! configured delay. Everything lives in memory for the lifetime of the
//! process.
//!
//! # Crate Layout
//!
//! - [`catalog`]: Validated, read-only set of plan templates
//! - [`engine`]: Run coordinator, readiness resolver and automation driver
//! - [`models`]: Plans, runs, step states and filters
//! - [`params`]: Operation parameters shared by every interface
//! - [`config`]: Host-supplied engine configuration
//! - [`display`]: Markdown rendering for terminal and MCP output
//! - [`error`]: Error types with stable wire codes
//!
//! # Quick Start
//!
//! ```rust
//! use conductor_core::{
//!     catalog::PlanCatalog,
//!     params::{QueryRuns, StartRun},
//!     EngineBuilder,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = PlanCatalog::from_json_str(
//!     r#"[{"id": "deploy", "title": "Deploy", "steps": [
//!         {"id": "build", "title": "Build", "mode": "automated"},
//!         {"id": "approve", "title": "Approve", "depends_on": ["build"]}
//!     ]}]"#,
//! )?;
//!
//! let engine = EngineBuilder::new().with_catalog(catalog).build()?;
//!
//! let run = engine.start_run(&StartRun::new("deploy")).await?;
//! println!("{}", run);
//!
//! for run in engine.query_runs(&QueryRuns::default()).await? {
//!     println!("{}: {}", run.id, run.status);
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod models;
pub mod params;

// Re-export commonly used types
pub use catalog::PlanCatalog;
pub use config::{EngineConfig, RawEngineConfig};
pub use display::{OperationStatus, Plans, RunSummaries};
pub use engine::{Engine, EngineBuilder};
pub use error::{EngineError, Result};
pub use models::{
    ExecutionMode, Plan, PlanFilter, PlanStep, Run, RunFilter, RunStatus, RunSummary, StepState,
    StepStatus,
};
pub use params::{CompleteStep, Id, QueryPlans, QueryRuns, StartRun};
