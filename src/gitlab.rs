//! GitLab merge request client.
//!
//! Wraps the one hosting-API operation this crate needs: creating a merge
//! request. The client is fronted by the [`MergeRequestApi`] trait so the
//! pipeline can be tested against a recording fake.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::future::Future;
use url::Url;

/// Title used when the caller does not supply one
pub const DEFAULT_MR_TITLE: &str = "GitOps Bot MR";

/// Description used when the caller does not supply one
pub const DEFAULT_MR_DESCRIPTION: &str = "No description provided";

/// Label attached to every merge request this crate opens
pub const MR_LABEL: &str = "auto";

/// A fully specified merge request, ready for submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequest {
    /// Merge request title
    pub title: String,
    /// Merge request description
    pub description: String,
    /// Branch carrying the changes
    pub source_branch: String,
    /// Branch the changes should land on
    pub target_branch: String,
    /// Project the merge request belongs to, as `group/project`
    pub project_path: String,
}

/// Incremental builder for a [`MergeRequest`]
#[derive(Debug, Clone)]
pub struct MergeRequestBuilder {
    project_path: String,
    source_branch: String,
    target_branch: String,
    title: Option<String>,
    description: Option<String>,
}

impl MergeRequestBuilder {
    /// Start a merge request between two branches of a project
    pub fn new(
        project_path: impl Into<String>,
        source_branch: impl Into<String>,
        target_branch: impl Into<String>,
    ) -> Self {
        Self {
            project_path: project_path.into(),
            source_branch: source_branch.into(),
            target_branch: target_branch.into(),
            title: None,
            description: None,
        }
    }

    /// Set the title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Finalize the spec, applying the documented defaults for anything
    /// left unset.
    pub fn build(self) -> MergeRequest {
        MergeRequest {
            title: self.title.unwrap_or_else(|| DEFAULT_MR_TITLE.to_string()),
            description: self
                .description
                .unwrap_or_else(|| DEFAULT_MR_DESCRIPTION.to_string()),
            source_branch: self.source_branch,
            target_branch: self.target_branch,
            project_path: self.project_path,
        }
    }
}

/// Trait fronting merge-request creation on the hosting API
pub trait MergeRequestApi: Send + Sync {
    /// Create a merge request, returning its IID
    fn create_merge_request(
        &self,
        merge_request: &MergeRequest,
    ) -> impl Future<Output = Result<u64>> + Send;
}

/// GitLab REST API client
#[derive(Debug, Clone)]
pub struct GitLabClient {
    base: Url,
    access_token: String,
    http: reqwest::Client,
}

impl GitLabClient {
    /// Configure API access with a base URL (e.g. `https://gitlab.example.com`)
    /// and a personal or project access token.
    pub fn new(api_url: &str, access_token: impl Into<String>) -> Result<Self> {
        let base = Url::parse(api_url)
            .map_err(|e| Error::invalid_argument(format!("invalid API URL `{api_url}`: {e}")))?;
        Ok(Self {
            base,
            access_token: access_token.into(),
            http: reqwest::Client::new(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct CreatedMergeRequest {
    iid: u64,
}

impl MergeRequestApi for GitLabClient {
    async fn create_merge_request(&self, merge_request: &MergeRequest) -> Result<u64> {
        let endpoint = self
            .base
            .join(&format!(
                "api/v4/projects/{}/merge_requests",
                encode_project_path(&merge_request.project_path)
            ))
            .map_err(|e| Error::invalid_argument(format!("invalid project path: {e}")))?;

        let response = self
            .http
            .post(endpoint)
            .header("PRIVATE-TOKEN", &self.access_token)
            .json(&serde_json::json!({
                "title": merge_request.title,
                "description": merge_request.description,
                "source_branch": merge_request.source_branch,
                "target_branch": merge_request.target_branch,
                "labels": MR_LABEL,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        let created: CreatedMergeRequest = response.json().await?;
        log::info!(
            "opened merge request !{} for {}",
            created.iid,
            merge_request.project_path
        );
        Ok(created.iid)
    }
}

/// Percent-encode a project path for use as a single URL path segment.
///
/// GitLab addresses projects by their URL-encoded full path, so `/` must
/// become `%2F`.
fn encode_project_path(path: &str) -> String {
    let mut encoded = String::with_capacity(path.len());
    for byte in path.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}
