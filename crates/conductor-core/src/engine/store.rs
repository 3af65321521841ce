//! In-memory run storage.

use std::collections::HashMap;

use crate::models::Run;

/// Mutable store of every run started by an engine.
///
/// Runs are kept in creation order; the index maps run identifiers to
/// positions. Runs are never removed.
#[derive(Debug, Default)]
pub(crate) struct RunStore {
    runs: Vec<Run>,
    index: HashMap<String, usize>,
    last_sequence: u64,
}

impl RunStore {
    /// Allocates the next run identifier (`run-001`, `run-002`, ...).
    pub(crate) fn next_run_id(&mut self) -> String {
        self.last_sequence += 1;
        format!("run-{:03}", self.last_sequence)
    }

    pub(crate) fn insert(&mut self, run: Run) {
        self.index.insert(run.id.clone(), self.runs.len());
        self.runs.push(run);
    }

    pub(crate) fn get(&self, id: &str) -> Option<&Run> {
        self.index.get(id).map(|&i| &self.runs[i])
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Run> {
        match self.index.get(id) {
            Some(&i) => self.runs.get_mut(i),
            None => None,
        }
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, Run> {
        self.runs.iter()
    }
}
