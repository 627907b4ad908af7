//! Pipeline configuration loaded from a local `ci.yaml`.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Default config file name looked up in the working directory
pub const CONFIG_FILE: &str = "ci.yaml";

fn default_mr_target_branch() -> String {
    "main".to_string()
}

/// Per-repository pipeline configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineConfig {
    /// SSH URL of the GitOps repository holding the values files
    pub ops_repository: String,
    /// Environment whose revision this pipeline manages
    pub environment: String,
    /// Free-form tags attached by the pipeline author
    #[serde(default)]
    pub tags: Vec<String>,
    /// Project path merge requests are opened against
    #[serde(default)]
    pub project_path: Option<String>,
    /// Branch merge requests target; defaults to `main`
    #[serde(default = "default_mr_target_branch")]
    pub mr_target_branch: String,
}

impl PipelineConfig {
    /// Load the config from `path`.
    ///
    /// Returns `Ok(None)` when the file does not exist; an absent config
    /// means the pipeline has nothing to do, not that it failed.
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Some(config))
    }
}
