//! Data models for plans, runs and step states.
//!
//! Plans are immutable templates supplied through the
//! [`crate::catalog::PlanCatalog`]. Runs are created from plans by the
//! [`crate::engine::Engine`] and carry a snapshot of the plan they were started
//! from, so later catalog changes never leak into a run in flight.
//!
//! Display implementations for these models live in
//! [`crate::display::models`] and render markdown.
//!
//! # Examples
//!
//! ```rust
//! use conductor_core::models::{ExecutionMode, Plan, PlanStep};
//!
//! let plan = Plan {
//!     id: "restart".to_string(),
//!     title: "Restart service".to_string(),
//!     steps: vec![
//!         PlanStep {
//!             id: "drain".to_string(),
//!             title: "Drain traffic".to_string(),
//!             mode: ExecutionMode::Automated,
//!             ..Default::default()
//!         },
//!         PlanStep {
//!             id: "verify".to_string(),
//!             title: "Verify health".to_string(),
//!             depends_on: vec!["drain".to_string()],
//!             ..Default::default()
//!         },
//!     ],
//!     ..Default::default()
//! };
//! assert!(plan.step("verify").unwrap().depends_on_step("drain"));
//! ```

pub mod filters;
pub mod plan;
pub mod run;
pub mod status;
pub mod summary;

#[cfg(test)]
mod tests;

pub use filters::{PlanFilter, RunFilter};
pub use plan::{Plan, PlanStep};
pub use run::{Run, StepState};
pub use status::{ExecutionMode, RunStatus, StepStatus};
pub use summary::RunSummary;
