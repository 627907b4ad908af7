//! Clone and push subcommands.

use crate::cli::{Command, OutputManager};
use crate::error::Result;
use crate::exec::ProcessEngine;
use crate::git::{GitRepository, PushOptions, SshKey};

pub(super) async fn execute_clone(command: &Command, output: &OutputManager) -> Result<()> {
    let Command::Clone { repo_url, ssh_key } = command else {
        unreachable!()
    };

    let engine = ProcessEngine::new();
    let repo = GitRepository::new(repo_url, Some(SshKey::from_file(ssh_key)?));
    let workspace = repo.clone_ssh(&engine).await?;

    // Hand the tree over to the caller instead of cleaning it up.
    let path = workspace.into_path();
    output.success(&format!("cloned {} into {}", repo_url, path.display()));
    output.println(&path.display().to_string());
    Ok(())
}

pub(super) async fn execute_push(command: &Command, output: &OutputManager) -> Result<()> {
    let Command::Push {
        repo_url,
        ssh_key,
        dir,
        branch,
        message,
        user_name,
        user_email,
    } = command
    else {
        unreachable!()
    };

    let engine = ProcessEngine::new();
    let repo = GitRepository::new(repo_url, Some(SshKey::from_file(ssh_key)?));
    let workspace = repo.open_dir(&engine, dir).await?;
    repo.push(
        &engine,
        &workspace,
        PushOptions {
            branch: branch.clone(),
            message: message.clone(),
            user_name: user_name.clone(),
            user_email: user_email.clone(),
        },
    )
    .await?;

    output.success(&format!("pushed {}", dir.display()));
    Ok(())
}
