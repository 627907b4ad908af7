//! End-to-end pipeline entry point.
//!
//! Straight-line flow: load config, clone the ops repository, update the
//! Helm revision, and open a merge request only when something actually
//! changed. Missing config and already-deployed revisions are successful
//! no-ops.

use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::exec::ExecutionEngine;
use crate::git::{GitRepository, SshKey};
use crate::gitlab::{MergeRequestApi, MergeRequestBuilder};
use crate::update::{revision_branch, update_helm_revision};
use std::path::Path;

/// What a pipeline run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// No config file was present; nothing to do
    Skipped,
    /// The requested revision was already deployed; nothing pushed
    AlreadyDeployed,
    /// The revision was updated and a merge request opened
    MergeRequestOpened {
        /// IID of the created merge request
        iid: u64,
        /// Branch the update was pushed to
        branch: String,
    },
}

/// Run the revision-update pipeline for `version`.
///
/// Reads the config at `config_path`; when it is absent the run is a
/// successful no-op. A merge request is opened only when the Helm updater
/// reports that it changed something.
pub async fn run<E: ExecutionEngine, A: MergeRequestApi>(
    engine: &E,
    api: &A,
    key: SshKey,
    version: &str,
    config_path: impl AsRef<Path>,
) -> Result<PipelineOutcome> {
    let config_path = config_path.as_ref();
    let Some(config) = PipelineConfig::load(config_path)? else {
        log::info!("no config at {}, skipping", config_path.display());
        return Ok(PipelineOutcome::Skipped);
    };

    let branch = revision_branch(version);
    let repo = GitRepository::new(&config.ops_repository, Some(key));

    let updated =
        update_helm_revision(engine, &repo, &config.environment, version, Some(&branch)).await?;

    if !updated {
        log::info!("skip merge request, {version} already deployed");
        return Ok(PipelineOutcome::AlreadyDeployed);
    }

    let project_path = config.project_path.ok_or_else(|| {
        Error::invalid_argument("projectPath must be set in ci.yaml to open a merge request")
    })?;

    let merge_request = MergeRequestBuilder::new(project_path, &branch, config.mr_target_branch)
        .title(format!("Update Helm chart version => {version}"))
        .description("Opened by the GitOps revision pipeline")
        .build();

    let iid = api.create_merge_request(&merge_request).await?;
    Ok(PipelineOutcome::MergeRequestOpened { iid, branch })
}
