//! Builder for creating and configuring Engine instances.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use log::debug;

use super::{Engine, TaskExecutor, TokioExecutor};
use crate::{
    catalog::PlanCatalog,
    config::{EngineConfig, RawEngineConfig},
    error::{EngineError, Result},
};

/// Builder for creating and configuring Engine instances.
#[derive(Default)]
pub struct EngineBuilder {
    catalog: Option<PlanCatalog>,
    catalog_path: Option<PathBuf>,
    config: EngineConfig,
    executor: Option<Arc<dyn TaskExecutor>>,
}

impl EngineBuilder {
    /// Creates a new builder with default settings: an empty catalog, the
    /// default configuration and a [`TokioExecutor`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses an already assembled catalog.
    pub fn with_catalog(mut self, catalog: PlanCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Loads the catalog from a JSON file when building.
    ///
    /// Takes precedence over [`with_catalog`](Self::with_catalog).
    pub fn with_catalog_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.catalog_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Sets a resolved configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolves host-supplied configuration values, falling back to defaults.
    pub fn with_raw_config(mut self, raw: &RawEngineConfig) -> Self {
        self.config = EngineConfig::from_raw(raw);
        self
    }

    /// Overrides the automation delay.
    pub fn with_step_duration(mut self, step_duration: Duration) -> Self {
        self.config.step_duration = step_duration;
        self
    }

    /// Sets the executor that runs automation jobs.
    pub fn with_executor(mut self, executor: Arc<dyn TaskExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Builds the configured engine.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::FileSystem` if the catalog file cannot be read,
    /// `EngineError::Configuration` if it is not valid JSON, and
    /// `EngineError::InvalidPlan` if a plan fails validation.
    pub fn build(self) -> Result<Engine> {
        let catalog = match (self.catalog_path, self.catalog) {
            (Some(path), _) => PlanCatalog::from_json_file(&path).map_err(|e| match e {
                EngineError::Serialization { source } => EngineError::Configuration {
                    message: format!("Failed to parse catalog '{}': {source}", path.display()),
                },
                other => other,
            })?,
            (None, Some(catalog)) => catalog,
            (None, None) => PlanCatalog::default(),
        };

        debug!(
            "building engine with {} plans, step duration {:?}, source '{}'",
            catalog.len(),
            self.config.step_duration,
            self.config.source
        );

        let executor = self
            .executor
            .unwrap_or_else(|| Arc::new(TokioExecutor) as Arc<dyn TaskExecutor>);
        Ok(Engine::new(catalog, self.config, executor))
    }
}
