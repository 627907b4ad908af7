//! Command line argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// GitOps automation actions
#[derive(Parser, Debug)]
#[command(
    name = "gitops-actions",
    version,
    about = "GitOps automation actions: clone/push over SSH, Helm value updates, merge requests"
)]
pub struct Args {
    /// Action to run
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// One subcommand per action
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Clone a repository over SSH and print the working tree path
    Clone {
        /// SSH URL of the repository
        #[arg(long)]
        repo_url: String,
        /// Path to the SSH private key
        #[arg(long)]
        ssh_key: PathBuf,
    },

    /// Commit all changes in a local working tree and push them
    Push {
        /// SSH URL of the repository
        #[arg(long)]
        repo_url: String,
        /// Path to the SSH private key
        #[arg(long)]
        ssh_key: PathBuf,
        /// Working tree with the changes
        #[arg(long)]
        dir: PathBuf,
        /// Branch to push to (created if needed); default `main` stays as-is
        #[arg(long)]
        branch: Option<String>,
        /// Commit message; defaults to `autocommit`
        #[arg(long)]
        message: Option<String>,
        /// Git user name; defaults to the bot identity
        #[arg(long)]
        user_name: Option<String>,
        /// Git user email; defaults to the bot identity
        #[arg(long)]
        user_email: Option<String>,
    },

    /// Update the Helm chart revision of one environment, skipping when it
    /// is already deployed
    UpdateHelmRevision {
        /// SSH URL of the ops repository
        #[arg(long)]
        repo_url: String,
        /// Path to the SSH private key
        #[arg(long)]
        ssh_key: PathBuf,
        /// Environment name in the values file
        #[arg(long)]
        environment: String,
        /// Revision to deploy
        #[arg(long)]
        revision: String,
        /// Branch to push the update to; defaults to `main`
        #[arg(long)]
        push_branch: Option<String>,
    },

    /// Set an arbitrary dotted-path field of a values file to a revision
    UpdateImageTag {
        /// SSH URL of the repository
        #[arg(long)]
        repo_url: String,
        /// Path to the SSH private key
        #[arg(long)]
        ssh_key: PathBuf,
        /// Values file, relative to the repository root
        #[arg(long)]
        values_file: String,
        /// Dotted field path, e.g. `image.tag`
        #[arg(long)]
        path: String,
        /// Revision to write
        #[arg(long)]
        revision: String,
        /// Push to an update branch instead of the default branch
        #[arg(long)]
        create_pr: bool,
    },

    /// Open a merge request on the hosting API
    CreateMr {
        /// Base URL of the GitLab instance
        #[arg(long, env = "GITLAB_API_URL")]
        api_url: String,
        /// Access token for the API
        #[arg(long, env = "GITLAB_TOKEN", hide_env_values = true)]
        token: String,
        /// Project path, e.g. `group/app`
        #[arg(long)]
        project_path: String,
        /// Branch carrying the changes
        #[arg(long)]
        source_branch: String,
        /// Branch to merge into
        #[arg(long, default_value = "main")]
        target_branch: String,
        /// Title; defaults to the bot title
        #[arg(long)]
        title: Option<String>,
        /// Description; defaults to a placeholder
        #[arg(long)]
        description: Option<String>,
    },

    /// Run the full pipeline driven by a local `ci.yaml`
    Run {
        /// Path to the SSH private key
        #[arg(long)]
        ssh_key: PathBuf,
        /// Base URL of the GitLab instance
        #[arg(long, env = "GITLAB_API_URL")]
        api_url: String,
        /// Access token for the API
        #[arg(long, env = "GITLAB_TOKEN", hide_env_values = true)]
        token: String,
        /// Revision to roll out
        #[arg(long)]
        version: String,
        /// Pipeline config file
        #[arg(long, default_value = crate::config::CONFIG_FILE)]
        config: PathBuf,
    },
}

impl Command {
    /// Name of the subcommand, for log and error messages
    pub fn name(&self) -> &'static str {
        match self {
            Command::Clone { .. } => "clone",
            Command::Push { .. } => "push",
            Command::UpdateHelmRevision { .. } => "update-helm-revision",
            Command::UpdateImageTag { .. } => "update-image-tag",
            Command::CreateMr { .. } => "create-mr",
            Command::Run { .. } => "run",
        }
    }
}
