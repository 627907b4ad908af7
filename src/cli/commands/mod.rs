//! Command execution coordinating the actions behind each subcommand.

mod mr;
mod repo;
mod run;
mod update;

use crate::cli::{Args, Command, OutputManager};
use crate::error::Result;

use mr::execute_create_mr;
use repo::{execute_clone, execute_push};
use run::execute_run;
use update::{execute_update_helm_revision, execute_update_image_tag};

/// Execute the parsed command, returning the process exit code
pub async fn execute_command(args: Args) -> Result<i32> {
    let output = OutputManager::new();

    let result = match &args.command {
        Command::Clone { .. } => execute_clone(&args.command, &output).await,
        Command::Push { .. } => execute_push(&args.command, &output).await,
        Command::UpdateHelmRevision { .. } => {
            execute_update_helm_revision(&args.command, &output).await
        }
        Command::UpdateImageTag { .. } => execute_update_image_tag(&args.command, &output).await,
        Command::CreateMr { .. } => execute_create_mr(&args.command, &output).await,
        Command::Run { .. } => execute_run(&args.command, &output).await,
    };

    match result {
        Ok(()) => Ok(0),
        Err(e) => {
            output.error(&format!("command '{}' failed: {}", args.command.name(), e));
            Ok(1)
        }
    }
}
