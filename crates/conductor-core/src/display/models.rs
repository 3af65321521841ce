//! Display implementations for domain models.
//!
//! Kept apart from the model definitions so the models stay plain data. All
//! output is markdown with status icons for steps.

use std::{collections::BTreeMap, fmt};

use super::datetime::LocalDateTime;
use crate::models::{
    ExecutionMode, Plan, PlanStep, Run, RunStatus, RunSummary, StepState, StepStatus,
};

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Renders `k=v` pairs on one line.
pub(crate) fn key_values(map: &BTreeMap<String, String>) -> String {
    map.iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn write_step_header(
    f: &mut fmt::Formatter<'_>,
    position: usize,
    step: &PlanStep,
) -> fmt::Result {
    writeln!(f, "### {}. {} (`{}`)", position, step.title, step.id)?;
    writeln!(f)?;
    writeln!(f, "- Mode: {}", step.mode)?;
    if step.has_dependencies() {
        writeln!(f, "- Depends on: {}", step.depends_on.join(", "))?;
    }
    Ok(())
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {} ({})", self.title, self.id)?;
        writeln!(f)?;

        if !self.version.is_empty() {
            writeln!(f, "- Version: {}", self.version)?;
        }
        if !self.tags.is_empty() {
            writeln!(f, "- Tags: {}", key_values(&self.tags))?;
        }
        if !self.url.is_empty() {
            writeln!(f, "- URL: {}", self.url)?;
        }

        if !self.description.is_empty() {
            writeln!(f)?;
            writeln!(f, "{}", self.description)?;
        }

        if self.steps.is_empty() {
            return writeln!(f, "\nNo steps in this plan.");
        }

        writeln!(f, "\n## Steps")?;
        writeln!(f)?;
        for (index, step) in self.steps.iter().enumerate() {
            write_step_header(f, index + 1, step)?;
            writeln!(f)?;
            if !step.description.is_empty() {
                writeln!(f, "{}", step.description)?;
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl StepState {
    fn fmt_progress(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- Status: {}", self.status.with_icon())?;
        if let Some(started) = &self.started_at {
            writeln!(f, "- Started: {}", LocalDateTime(started))?;
        }
        if self.status == StepStatus::Succeeded {
            if !self.actor.is_empty() {
                writeln!(f, "- Completed by: {}", self.actor)?;
            }
            if let Some(finished) = &self.finished_at {
                writeln!(f, "- Finished: {}", LocalDateTime(finished))?;
            }
            if !self.note.is_empty() {
                writeln!(f, "- Note: {}", self.note)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Run {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let succeeded = self
            .steps
            .iter()
            .filter(|s| s.status == StepStatus::Succeeded)
            .count();

        writeln!(f, "# Run {}: {}", self.id, self.plan.title)?;
        writeln!(f)?;
        writeln!(f, "- Plan: {}", self.plan_id)?;
        writeln!(f, "- Status: {}", self.status)?;
        writeln!(f, "- Progress: {}/{} steps succeeded", succeeded, self.steps.len())?;
        if !self.scope.is_empty() {
            writeln!(f, "- Scope: {}", key_values(&self.scope))?;
        }
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if self.steps.is_empty() {
            return writeln!(f, "\nNo steps in this run.");
        }

        writeln!(f, "\n## Steps")?;
        writeln!(f)?;
        for (index, state) in self.steps.iter().enumerate() {
            match self.plan.step(&state.step_id) {
                Some(step) => write_step_header(f, index + 1, step)?,
                None => {
                    writeln!(f, "### {}. `{}`", index + 1, state.step_id)?;
                    writeln!(f)?;
                }
            }
            state.fmt_progress(f)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "## {}: {} ({}/{})",
            self.id, self.title, self.succeeded_steps, self.total_steps
        )?;
        writeln!(f)?;
        writeln!(f, "- **Plan**: {}", self.plan_id)?;
        writeln!(f, "- **Status**: {}", self.status)?;
        if self.running_steps > 0 {
            writeln!(f, "- **Running**: {}", self.running_steps)?;
        }
        if self.ready_steps > 0 {
            writeln!(f, "- **Awaiting completion**: {}", self.ready_steps)?;
        }
        writeln!(f, "- **Created**: {}", LocalDateTime(&self.created_at))?;
        writeln!(f)?;
        Ok(())
    }
}
