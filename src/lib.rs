//! # gitops-actions
//!
//! Automation actions for GitOps pipelines: clone and push Git repositories
//! over SSH, update Helm values files, and open merge requests on a GitLab
//! instance. All of it is sequential shell-outs to `git` inside a prepared
//! execution environment, plus one REST call to the hosting API.
//!
//! The execution engine is injected everywhere, so every action can be
//! driven against a fake in tests.
//!
//! ## Usage
//!
//! ```bash
//! gitops-actions clone --repo-url git@host:group/app.git --ssh-key ~/.ssh/id
//! gitops-actions update-helm-revision --repo-url ... --ssh-key ... \
//!     --environment prod --revision 1.2.0
//! gitops-actions run --ssh-key ... --api-url https://gitlab.example.com \
//!     --version 1.2.0
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// Core modules
pub mod cli;
pub mod config;
pub mod error;
pub mod exec;
pub mod git;
pub mod gitlab;
pub mod pipeline;
pub mod update;
pub mod values;

// Re-export main types for public API
pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use exec::{ContainerSpec, ExecOutput, ExecutionEngine, ProcessEngine, Workspace};
pub use git::{GitRepository, PushOptions, SshKey};
pub use gitlab::{GitLabClient, MergeRequest, MergeRequestApi, MergeRequestBuilder};
pub use pipeline::PipelineOutcome;
pub use values::ValuesFile;
