//! Values-file update subcommands.

use crate::cli::{Command, OutputManager};
use crate::error::Result;
use crate::exec::ProcessEngine;
use crate::git::{GitRepository, SshKey};
use crate::update::{update_helm_revision, update_image_tag};

pub(super) async fn execute_update_helm_revision(
    command: &Command,
    output: &OutputManager,
) -> Result<()> {
    let Command::UpdateHelmRevision {
        repo_url,
        ssh_key,
        environment,
        revision,
        push_branch,
    } = command
    else {
        unreachable!()
    };

    let engine = ProcessEngine::new();
    let repo = GitRepository::new(repo_url, Some(SshKey::from_file(ssh_key)?));
    let updated = update_helm_revision(
        &engine,
        &repo,
        environment,
        revision,
        push_branch.as_deref(),
    )
    .await?;

    if updated {
        output.success(&format!("updated {environment} to {revision}"));
    } else {
        output.info(&format!("{revision} already deployed for {environment}"));
    }
    Ok(())
}

pub(super) async fn execute_update_image_tag(
    command: &Command,
    output: &OutputManager,
) -> Result<()> {
    let Command::UpdateImageTag {
        repo_url,
        ssh_key,
        values_file,
        path,
        revision,
        create_pr,
    } = command
    else {
        unreachable!()
    };

    let engine = ProcessEngine::new();
    let repo = GitRepository::new(repo_url, Some(SshKey::from_file(ssh_key)?));
    update_image_tag(&engine, &repo, values_file, path, revision, *create_pr).await?;

    output.success(&format!("set {path} = {revision} in {values_file}"));
    Ok(())
}
