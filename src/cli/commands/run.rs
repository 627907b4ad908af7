//! Full pipeline subcommand.

use crate::cli::{Command, OutputManager};
use crate::error::Result;
use crate::exec::ProcessEngine;
use crate::git::SshKey;
use crate::gitlab::GitLabClient;
use crate::pipeline::{self, PipelineOutcome};

pub(super) async fn execute_run(command: &Command, output: &OutputManager) -> Result<()> {
    let Command::Run {
        ssh_key,
        api_url,
        token,
        version,
        config,
    } = command
    else {
        unreachable!()
    };

    let engine = ProcessEngine::new();
    let api = GitLabClient::new(api_url, token.clone())?;
    let key = SshKey::from_file(ssh_key)?;

    match pipeline::run(&engine, &api, key, version, config).await? {
        PipelineOutcome::Skipped => {
            output.info("no pipeline config found, nothing to do");
        }
        PipelineOutcome::AlreadyDeployed => {
            output.info(&format!("{version} already deployed, nothing to do"));
        }
        PipelineOutcome::MergeRequestOpened { iid, branch } => {
            output.success(&format!("pushed {branch} and opened merge request !{iid}"));
        }
    }
    Ok(())
}
