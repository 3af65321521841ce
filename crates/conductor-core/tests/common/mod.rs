use std::{fs, sync::Arc};

use conductor_core::{
    engine::{EngineBuilder, ManualExecutor},
    Engine,
};
use tempfile::TempDir;

/// Release plan: automated build, two manual approvals, automated rollout.
pub const RELEASE_CATALOG: &str = r#"{
  "plans": [
    {
      "id": "release",
      "title": "Release",
      "description": "Ship a tagged build",
      "tags": {"team": "platform"},
      "steps": [
        {"id": "build", "title": "Build artifacts", "mode": "automated"},
        {"id": "qa", "title": "QA sign-off", "depends_on": ["build"]},
        {"id": "security", "title": "Security sign-off", "depends_on": ["build"]},
        {"id": "rollout", "title": "Roll out", "depends_on": ["qa", "security"],
         "metadata": {"automated": true}}
      ]
    },
    {
      "id": "empty",
      "title": "Placeholder"
    }
  ]
}"#;

/// Helper function to write a catalog file and build an engine from it
pub fn create_test_engine(catalog: &str) -> (TempDir, Arc<ManualExecutor>, Engine) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let catalog_path = temp_dir.path().join("catalog.json");
    fs::write(&catalog_path, catalog).expect("Failed to write catalog");

    let executor = Arc::new(ManualExecutor::new());
    let engine = EngineBuilder::new()
        .with_catalog_path(Some(&catalog_path))
        .with_executor(executor.clone())
        .build()
        .expect("Failed to create engine");
    (temp_dir, executor, engine)
}
