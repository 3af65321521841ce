//! Collection wrapper types for displaying groups of domain objects.
//!
//! Lists are rendered compactly: one `##` section per item and a fixed line
//! when the collection is empty. Full detail is left to the item's own
//! `Display` implementation.

use std::fmt;

use super::models::key_values;
use crate::models::{Plan, RunSummary};

/// Newtype wrapper for displaying a list of catalog plans.
///
/// Each plan is rendered as a short entry (title, id, step count, tags and
/// description) rather than with its full step breakdown.
///
/// # Examples
///
/// ```rust
/// use conductor_core::{display::Plans, models::Plan};
///
/// let plans = Plans(vec![Plan {
///     id: "restart".to_string(),
///     title: "Restart service".to_string(),
///     ..Default::default()
/// }]);
/// let output = format!("{}", plans);
/// assert!(output.contains("## Restart service (ID: restart)"));
///
/// assert_eq!(Plans(vec![]).to_string(), "No plans found.\n");
/// ```
pub struct Plans(pub Vec<Plan>);

impl Plans {
    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of plans in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get an iterator over the plans.
    pub fn iter(&self) -> std::slice::Iter<'_, Plan> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Plans {
    type Item = &'a Plan;
    type IntoIter = std::slice::Iter<'a, Plan>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Plans {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No plans found.");
        }

        for plan in &self.0 {
            let automated = plan.steps.iter().filter(|s| s.is_automated()).count();
            writeln!(f, "## {} (ID: {})", plan.title, plan.id)?;
            writeln!(f)?;
            writeln!(
                f,
                "- **Steps**: {} ({} automated)",
                plan.steps.len(),
                automated
            )?;
            if !plan.tags.is_empty() {
                writeln!(f, "- **Tags**: {}", key_values(&plan.tags))?;
            }
            if let Some(line) = plan.description.lines().find(|l| !l.trim().is_empty()) {
                writeln!(f, "- **Description**: {}", line.trim())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying run summaries.
pub struct RunSummaries(pub Vec<RunSummary>);

impl RunSummaries {
    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of summaries in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get an iterator over the summaries.
    pub fn iter(&self) -> std::slice::Iter<'_, RunSummary> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a RunSummaries {
    type Item = &'a RunSummary;
    type IntoIter = std::slice::Iter<'a, RunSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for RunSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No runs found.")
        } else {
            for summary in &self.0 {
                write!(f, "{}", summary)?;
            }
            Ok(())
        }
    }
}
