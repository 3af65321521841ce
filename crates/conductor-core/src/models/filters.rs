//! Filter types for querying plans and runs.

use std::collections::BTreeMap;

use super::{Plan, Run, RunStatus};

/// Filter options for querying runs.
///
/// Empty collections and `None` fields do not constrain the result.
#[derive(Debug, Clone, Default)]
pub struct RunFilter {
    /// Keep runs whose status is in this set
    pub statuses: Vec<RunStatus>,

    /// Keep runs started from one of these plans
    pub plan_ids: Vec<String>,

    /// Keep runs whose scope contains every `(key, value)` pair
    pub scope: BTreeMap<String, String>,

    /// Case-insensitive substring over run id and plan id
    pub query: Option<String>,

    /// Keep runs whose plan snapshot carries every `(key, value)` tag
    pub tags: BTreeMap<String, String>,

    /// Maximum number of runs returned, applied after filtering
    pub limit: Option<usize>,
}

impl RunFilter {
    /// Returns true when `run` satisfies every populated criterion.
    pub fn matches(&self, run: &Run) -> bool {
        if !self.statuses.is_empty() && !self.statuses.contains(&run.status) {
            return false;
        }
        if !self.plan_ids.is_empty() && !self.plan_ids.iter().any(|id| *id == run.plan_id) {
            return false;
        }
        if !self
            .scope
            .iter()
            .all(|(key, value)| run.scope.get(key) == Some(value))
        {
            return false;
        }
        if let Some(query) = non_blank(self.query.as_deref()) {
            if !contains_ignore_case(&run.id, query) && !contains_ignore_case(&run.plan_id, query) {
                return false;
            }
        }
        run.plan.has_tags(&self.tags)
    }
}

/// Filter options for querying plans.
#[derive(Debug, Clone, Default)]
pub struct PlanFilter {
    /// Keep plans with one of these identifiers
    pub ids: Vec<String>,

    /// Case-insensitive substring over id, title and description
    pub query: Option<String>,

    /// Keep plans carrying every `(key, value)` tag
    pub tags: BTreeMap<String, String>,

    /// Maximum number of plans returned, applied after filtering
    pub limit: Option<usize>,
}

impl PlanFilter {
    /// Returns true when `plan` satisfies every populated criterion.
    pub fn matches(&self, plan: &Plan) -> bool {
        if !self.ids.is_empty() && !self.ids.iter().any(|id| *id == plan.id) {
            return false;
        }
        if let Some(query) = non_blank(self.query.as_deref()) {
            let hit = [&plan.id, &plan.title, &plan.description]
                .iter()
                .any(|field| contains_ignore_case(field, query));
            if !hit {
                return false;
            }
        }
        plan.has_tags(&self.tags)
    }
}

fn non_blank(query: Option<&str>) -> Option<&str> {
    query.map(str::trim).filter(|q| !q.is_empty())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
