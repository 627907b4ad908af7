//! Helm revision and image tag update actions.
//!
//! Both actions clone the ops repository, rewrite a values file in the
//! working tree, and push the result. The revision updater additionally
//! compares the deployed revision first so reconciling already-applied state
//! never produces a commit.

use crate::error::Result;
use crate::exec::{ExecutionEngine, argv};
use crate::git::{DEFAULT_BRANCH, GitRepository, PushOptions};
use crate::values::{HELM_VALUES_FILE, ValuesFile};
use serde_yaml::Value;

/// Branch name derived from a target revision
pub fn revision_branch(revision: &str) -> String {
    format!("update/helm-revision-{revision}")
}

/// Point the named environment at a new Helm chart revision.
///
/// Clones the repository, switches to `push_branch` (default `main`), and
/// compares the deployed `targetRevision` against `revision` after trimming
/// whitespace on both sides. Returns `Ok(false)` without touching the
/// repository when they already match; otherwise rewrites the values file,
/// pushes, and returns `Ok(true)`.
pub async fn update_helm_revision<E: ExecutionEngine>(
    engine: &E,
    repo: &GitRepository,
    env_name: &str,
    revision: &str,
    push_branch: Option<&str>,
) -> Result<bool> {
    let workspace = repo.clone_ssh(engine).await?;

    let branch = push_branch.unwrap_or(DEFAULT_BRANCH);
    engine
        .exec(&workspace, &argv(["git", "switch", "-c", branch]))
        .await?;

    let values_path = workspace.root().join(HELM_VALUES_FILE);
    let mut values = ValuesFile::load(&values_path)?;
    let deployed = values.environment_revision(env_name)?;

    if revision.trim() == deployed.trim() {
        log::info!("revision {deployed} already deployed for {env_name}, skipping");
        return Ok(false);
    }

    values.set_environment_revision(env_name, revision)?;
    values.save(&values_path)?;
    log::info!("updating {env_name} from {deployed} to {revision} on {branch}");

    // Already on the push branch; push commits where we stand.
    repo.push(engine, &workspace, PushOptions::default()).await?;
    Ok(true)
}

/// Unconditionally rewrite a dotted-path-addressed field in a values file
/// and push the change.
///
/// With `create_pr` the change lands on an `update/helm-revision-<revision>`
/// branch, ready for a merge request; otherwise it goes straight to the
/// default branch.
pub async fn update_image_tag<E: ExecutionEngine>(
    engine: &E,
    repo: &GitRepository,
    values_file: &str,
    field_path: &str,
    revision: &str,
    create_pr: bool,
) -> Result<()> {
    let workspace = repo.clone_ssh(engine).await?;

    let values_path = workspace.root().join(values_file);
    let mut values = ValuesFile::load(&values_path)?;
    values.set(field_path, Value::String(revision.to_string()))?;
    values.save(&values_path)?;
    log::info!("set {field_path} = {revision} in {values_file}");

    let branch = create_pr.then(|| revision_branch(revision));
    repo.push(
        engine,
        &workspace,
        PushOptions {
            branch,
            ..PushOptions::default()
        },
    )
    .await
}
