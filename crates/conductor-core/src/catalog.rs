//! Immutable plan catalog.
//!
//! The catalog is assembled once from externally supplied plan data and then
//! shared read-only by the engine. Assembly validates every plan's dependency
//! graph so a malformed plan is rejected up front instead of producing a run
//! whose steps can never become ready.

use std::{
    collections::{HashMap, HashSet, VecDeque},
    path::Path,
};

use log::warn;
use serde::Deserialize;

use crate::{
    error::{EngineError, Result},
    models::{ExecutionMode, Plan},
};

/// Accepted top-level shapes of a catalog document.
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    List(Vec<Plan>),
    Wrapped { plans: Vec<Plan> },
}

/// Immutable mapping from plan identifier to plan definition.
#[derive(Debug, Clone, Default)]
pub struct PlanCatalog {
    plans: Vec<Plan>,
    index: HashMap<String, usize>,
}

impl PlanCatalog {
    /// Builds a catalog, normalizing and validating every plan.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidPlan` for an empty or duplicate plan id,
    /// duplicate step ids, dependencies on unknown steps or on the step itself,
    /// and dependency cycles.
    pub fn new(plans: Vec<Plan>) -> Result<Self> {
        let mut index = HashMap::with_capacity(plans.len());
        let mut normalized = Vec::with_capacity(plans.len());

        for mut plan in plans {
            if plan.id.trim().is_empty() {
                return Err(EngineError::invalid_plan(&plan.id).with_reason("plan id is empty"));
            }
            if index.contains_key(&plan.id) {
                return Err(EngineError::invalid_plan(&plan.id)
                    .with_reason("plan id appears more than once in the catalog"));
            }
            normalize_legacy_modes(&mut plan);
            validate_plan(&plan)?;
            index.insert(plan.id.clone(), normalized.len());
            normalized.push(plan);
        }

        Ok(Self {
            plans: normalized,
            index,
        })
    }

    /// Parses a catalog from JSON: either an array of plans or an object with
    /// a `plans` array.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let plans = match serde_json::from_str::<CatalogDocument>(json)? {
            CatalogDocument::List(plans) | CatalogDocument::Wrapped { plans } => plans,
        };
        Self::new(plans)
    }

    /// Reads and parses a JSON catalog file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| EngineError::FileSystem {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&json)
    }

    /// Looks up a plan by identifier.
    pub fn get(&self, id: &str) -> Option<&Plan> {
        self.index.get(id).map(|&i| &self.plans[i])
    }

    /// Iterates plans in the order they were supplied.
    pub fn iter(&self) -> std::slice::Iter<'_, Plan> {
        self.plans.iter()
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

/// Promotes steps carrying the deprecated `automated: true` metadata flag to
/// the automated execution mode.
fn normalize_legacy_modes(plan: &mut Plan) {
    for step in &mut plan.steps {
        if step.mode == ExecutionMode::Manual && step.has_legacy_automated_flag() {
            warn!(
                "plan '{}' step '{}' uses the deprecated 'automated' metadata flag; set mode=automated instead",
                plan.id, step.id
            );
            step.mode = ExecutionMode::Automated;
        }
    }
}

/// Checks that a plan's steps form a well-formed DAG.
///
/// # Errors
///
/// Returns `EngineError::InvalidPlan` describing the first problem found.
pub fn validate_plan(plan: &Plan) -> Result<()> {
    let mut ids = HashSet::with_capacity(plan.steps.len());
    for step in &plan.steps {
        if !ids.insert(step.id.as_str()) {
            return Err(EngineError::invalid_plan(&plan.id)
                .with_reason(format!("duplicate step id '{}'", step.id)));
        }
    }

    for step in &plan.steps {
        for dep in &step.depends_on {
            if *dep == step.id {
                return Err(EngineError::invalid_plan(&plan.id)
                    .with_reason(format!("step '{}' depends on itself", step.id)));
            }
            if !ids.contains(dep.as_str()) {
                return Err(EngineError::invalid_plan(&plan.id).with_reason(format!(
                    "step '{}' depends on unknown step '{dep}'",
                    step.id
                )));
            }
        }
    }

    let unresolved = unresolved_after_topological_sort(plan);
    if !unresolved.is_empty() {
        return Err(EngineError::invalid_plan(&plan.id).with_reason(format!(
            "dependency cycle among steps: {}",
            unresolved.join(", ")
        )));
    }

    Ok(())
}

/// Runs Kahn's algorithm and returns the steps that never reach in-degree
/// zero, in declaration order. Empty means the graph is acyclic.
fn unresolved_after_topological_sort(plan: &Plan) -> Vec<String> {
    let mut in_degree: HashMap<&str, usize> = plan
        .steps
        .iter()
        .map(|step| (step.id.as_str(), step.depends_on.len()))
        .collect();

    let mut queue: VecDeque<&str> = plan
        .steps
        .iter()
        .filter(|step| step.depends_on.is_empty())
        .map(|step| step.id.as_str())
        .collect();

    while let Some(done) = queue.pop_front() {
        for dependent in plan.steps.iter().filter(|s| s.depends_on_step(done)) {
            if let Some(degree) = in_degree.get_mut(dependent.id.as_str()) {
                // A repeated dependency entry counts once per occurrence.
                let edges = dependent.depends_on.iter().filter(|d| *d == done).count();
                *degree = degree.saturating_sub(edges);
                if *degree == 0 {
                    queue.push_back(dependent.id.as_str());
                }
            }
        }
    }

    plan.steps
        .iter()
        .filter(|step| in_degree.get(step.id.as_str()).copied().unwrap_or(0) > 0)
        .map(|step| step.id.clone())
        .collect()
}
