//! The orchestration run engine.
//!
//! [`Engine`] is the run coordinator: it owns the plan catalog and the run
//! store, exposes the public operations, and drives automated steps through
//! the automation driver.
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   Operations    │    │    Resolver     │    │   Automation    │
//! │ (run_ops,       │───▶│ (initial states,│───▶│ (driver +       │
//! │  query_ops)     │    │  propagation)   │    │  TaskExecutor)  │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//!         ▲                                              │
//!         └──────── deferred complete_step ◀─────────────┘
//! ```
//!
//! ## Submodules
//!
//! - [`builder`]: Factory for [`Engine`] instances
//! - [`resolver`]: Pure readiness rules over a run's step states
//! - [`automation`]: Automation driver and task executors
//! - `run_ops`: `start_run` and `complete_step`
//! - `query_ops`: Read-only plan and run queries
//!
//! ## Locking
//!
//! A single exclusive lock guards the run store. Every public operation holds
//! it for its full duration, including the submission of automation jobs;
//! the jobs themselves run without the lock until they re-enter
//! `complete_step`. The lock is coarse and independent of the number of runs.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use conductor_core::{
//!     catalog::PlanCatalog,
//!     engine::{EngineBuilder, ManualExecutor},
//!     models::{ExecutionMode, Plan, PlanStep, StepStatus},
//!     params::{CompleteStep, Id, StartRun},
//! };
//!
//! # async fn example() -> conductor_core::Result<()> {
//! let catalog = PlanCatalog::new(vec![Plan {
//!     id: "p".to_string(),
//!     title: "Example".to_string(),
//!     steps: vec![
//!         PlanStep {
//!             id: "s1".to_string(),
//!             title: "Automated".to_string(),
//!             mode: ExecutionMode::Automated,
//!             ..Default::default()
//!         },
//!         PlanStep {
//!             id: "s2".to_string(),
//!             title: "Manual".to_string(),
//!             depends_on: vec!["s1".to_string()],
//!             ..Default::default()
//!         },
//!     ],
//!     ..Default::default()
//! }])?;
//!
//! let executor = Arc::new(ManualExecutor::new());
//! let engine = EngineBuilder::new()
//!     .with_catalog(catalog)
//!     .with_executor(executor.clone())
//!     .build()?;
//!
//! let run = engine.start_run(&StartRun::new("p")).await?;
//! executor.run_until_idle().await;
//!
//! let run = engine.get_run(&Id::new(run.id)).await?;
//! assert_eq!(run.step_status("s2"), Some(StepStatus::Ready));
//!
//! engine
//!     .complete_step(&CompleteStep::new(run.id, "s2", "alice", "done"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{catalog::PlanCatalog, config::EngineConfig};

pub mod automation;
pub mod builder;
mod query_ops;
pub mod resolver;
mod run_ops;
mod store;

#[cfg(test)]
mod tests;

pub use automation::{
    Job, ManualExecutor, TaskExecutor, TokioExecutor, AUTOMATION_ACTOR, AUTOMATION_NOTE,
};
pub use builder::EngineBuilder;

use automation::AutomationDriver;
use store::RunStore;

/// Cheaply clonable handle to a run engine.
///
/// Clones share the same catalog, store and executor.
#[derive(Clone)]
pub struct Engine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    catalog: PlanCatalog,
    config: EngineConfig,
    store: Mutex<RunStore>,
    driver: AutomationDriver,
}

impl Engine {
    pub(crate) fn new(
        catalog: PlanCatalog,
        config: EngineConfig,
        executor: Arc<dyn TaskExecutor>,
    ) -> Self {
        let driver = AutomationDriver::new(executor, config.step_duration);
        Self {
            inner: Arc::new(EngineInner {
                catalog,
                config,
                store: Mutex::new(RunStore::default()),
                driver,
            }),
        }
    }

    /// The resolved configuration this engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }
}
