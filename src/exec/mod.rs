//! Execution-engine port for running commands in a prepared environment.
//!
//! This module defines the contract between the action layer and whatever
//! actually runs commands: a declarative [`ContainerSpec`] describing the
//! environment, an [`ExecutionEngine`] that materializes the spec and runs
//! commands in it one at a time, and the [`Workspace`] handle that doubles as
//! the directory snapshot passed between clone, mutation, and push stages.
//!
//! The engine is an explicit dependency of every action so that tests can
//! substitute a recording fake.

mod prepare;
mod process;

pub use prepare::{BASE_IMAGE, GitIdentity, SSH_KEY_MOUNT, prepare_git_container};
pub use process::ProcessEngine;

use crate::error::Result;
use std::future::Future;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Placeholder in env values that engines replace with the absolute
/// environment root once it is known.
pub const ROOT_TOKEN: &str = "{root}";

/// A file to place inside the execution environment before any command runs.
#[derive(Debug, Clone)]
pub struct FileMount {
    /// Destination path, relative to the environment root
    pub dest: PathBuf,
    /// File contents
    pub contents: Vec<u8>,
    /// Unix permission bits
    pub mode: u32,
}

/// Declarative description of an execution environment.
///
/// Building a spec performs no I/O; failures surface when an engine
/// materializes it or runs a command in it.
#[derive(Debug, Clone, Default)]
pub struct ContainerSpec {
    /// Base image reference, for engines that run real containers
    pub image: String,
    /// Files to mount before the first command
    pub mounts: Vec<FileMount>,
    /// Environment variables; values may contain [`ROOT_TOKEN`]
    pub env: Vec<(String, String)>,
    /// Commands run once, in order, when the environment is prepared
    pub setup: Vec<Vec<String>>,
    /// Existing directory to adopt as the working tree instead of starting
    /// from an empty one
    pub source_dir: Option<PathBuf>,
}

impl ContainerSpec {
    /// Adopt `dir` as the working tree; commands will mutate it in place.
    pub fn with_workdir_source(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_dir = Some(dir.into());
        self
    }
}

/// Output of a single successfully executed command.
#[derive(Debug, Clone, Default)]
pub struct ExecOutput {
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

/// A materialized execution environment: the working tree plus the
/// environment variables every command in it runs with.
///
/// Also serves as the directory snapshot returned by clone and consumed by
/// push; mutating files under [`Workspace::root`] between the two is how the
/// update actions stage their changes.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    env: Vec<(String, String)>,
    tmp: Option<TempDir>,
}

impl Workspace {
    /// Wrap an existing directory; used by engines that manage their own
    /// storage and by test fakes.
    pub fn new(root: impl Into<PathBuf>, env: Vec<(String, String)>) -> Self {
        Self {
            root: root.into(),
            env,
            tmp: None,
        }
    }

    /// Wrap a working tree whose backing temporary directory should live as
    /// long as the workspace.
    pub fn with_tempdir(root: impl Into<PathBuf>, env: Vec<(String, String)>, tmp: TempDir) -> Self {
        Self {
            root: root.into(),
            env,
            tmp: Some(tmp),
        }
    }

    /// Path of the working tree
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Environment variables commands in this workspace run with
    pub fn env(&self) -> &[(String, String)] {
        &self.env
    }

    /// Detach the working tree from automatic cleanup and return its path.
    pub fn into_path(mut self) -> PathBuf {
        if let Some(tmp) = self.tmp.take() {
            // Root lives inside the temp dir; disarm cleanup of the whole thing.
            let _ = tmp.keep();
        }
        self.root
    }
}

/// Trait defining the execution primitive every action shells out through
pub trait ExecutionEngine: Send + Sync {
    /// Materialize a spec into a live workspace, running its setup commands.
    fn prepare(&self, spec: &ContainerSpec) -> impl Future<Output = Result<Workspace>> + Send;

    /// Run one command inside a prepared workspace, failing on non-zero exit.
    fn exec(
        &self,
        workspace: &Workspace,
        argv: &[String],
    ) -> impl Future<Output = Result<ExecOutput>> + Send;
}

/// Build an argv vector from string-ish parts.
pub fn argv<const N: usize>(parts: [&str; N]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}
