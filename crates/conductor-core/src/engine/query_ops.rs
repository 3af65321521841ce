//! Read-only plan and run queries for the Engine.
//!
//! Every result is an owned clone; callers may mutate it freely.

use log::debug;

use super::Engine;
use crate::{
    error::{EngineError, Result},
    models::{Plan, PlanFilter, Run, RunFilter, RunSummary},
    params::{Id, QueryPlans, QueryRuns},
};

impl Engine {
    /// Lists catalog plans matching the query, in catalog order.
    pub async fn query_plans(&self, params: &QueryPlans) -> Result<Vec<Plan>> {
        debug!("query_plans: {:?}", params);
        let filter = PlanFilter::from(params);
        let _store = self.inner.store.lock().await;

        let plans = self
            .inner
            .catalog
            .iter()
            .filter(|plan| filter.matches(plan))
            .take(filter.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(plans)
    }

    /// Retrieves a plan by its identifier.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::PlanNotFound` if the catalog has no such plan.
    pub async fn get_plan(&self, params: &Id) -> Result<Plan> {
        let _store = self.inner.store.lock().await;

        self.inner
            .catalog
            .get(&params.id)
            .cloned()
            .ok_or_else(|| EngineError::PlanNotFound {
                id: params.id.clone(),
            })
    }

    /// Lists runs matching the query, in creation order.
    pub async fn query_runs(&self, params: &QueryRuns) -> Result<Vec<Run>> {
        debug!("query_runs: {:?}", params);
        let filter = RunFilter::from(params);
        let store = self.inner.store.lock().await;

        let runs = store
            .iter()
            .filter(|run| filter.matches(run))
            .take(filter.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(runs)
    }

    /// Lists progress summaries of the runs matching the query.
    pub async fn query_run_summaries(&self, params: &QueryRuns) -> Result<Vec<RunSummary>> {
        let filter = RunFilter::from(params);
        let store = self.inner.store.lock().await;

        let summaries = store
            .iter()
            .filter(|run| filter.matches(run))
            .take(filter.limit.unwrap_or(usize::MAX))
            .map(RunSummary::from)
            .collect();
        Ok(summaries)
    }

    /// Retrieves a run by its identifier.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::RunNotFound` if no run has that identifier.
    pub async fn get_run(&self, params: &Id) -> Result<Run> {
        let store = self.inner.store.lock().await;

        store
            .get(&params.id)
            .cloned()
            .ok_or_else(|| EngineError::RunNotFound {
                id: params.id.clone(),
            })
    }
}
