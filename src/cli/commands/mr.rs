//! Merge request subcommand.

use crate::cli::{Command, OutputManager};
use crate::error::Result;
use crate::gitlab::{GitLabClient, MergeRequestApi, MergeRequestBuilder};

pub(super) async fn execute_create_mr(command: &Command, output: &OutputManager) -> Result<()> {
    let Command::CreateMr {
        api_url,
        token,
        project_path,
        source_branch,
        target_branch,
        title,
        description,
    } = command
    else {
        unreachable!()
    };

    let client = GitLabClient::new(api_url, token.clone())?;
    let mut builder = MergeRequestBuilder::new(project_path, source_branch, target_branch);
    if let Some(title) = title {
        builder = builder.title(title);
    }
    if let Some(description) = description {
        builder = builder.description(description);
    }

    let iid = client.create_merge_request(&builder.build()).await?;
    output.success(&format!("opened merge request !{iid} in {project_path}"));
    Ok(())
}
