//! Shared test doubles: a recording execution engine and hosting API.

#![allow(dead_code)]

use gitops_actions::error::{Error, Result};
use gitops_actions::exec::{ContainerSpec, ExecOutput, ExecutionEngine, Workspace};
use gitops_actions::gitlab::{MergeRequest, MergeRequestApi};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Execution engine that records every command instead of running it.
///
/// The workspace root is supplied by the test and stands in for the cloned
/// working tree; tests seed it with whatever files the action should find.
pub struct FakeEngine {
    root: PathBuf,
    commands: Mutex<Vec<Vec<String>>>,
    fail_on: Option<String>,
}

impl FakeEngine {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            commands: Mutex::new(Vec::new()),
            fail_on: None,
        }
    }

    /// Fail any command whose command line contains `pattern`.
    pub fn failing_on(root: impl Into<PathBuf>, pattern: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            commands: Mutex::new(Vec::new()),
            fail_on: Some(pattern.into()),
        }
    }

    /// Every recorded command, one joined line per command.
    pub fn lines(&self) -> Vec<String> {
        self.commands
            .lock()
            .unwrap()
            .iter()
            .map(|argv| argv.join(" "))
            .collect()
    }

    pub fn ran(&self, needle: &str) -> bool {
        self.lines().iter().any(|line| line.contains(needle))
    }

    pub fn command_count(&self) -> usize {
        self.commands.lock().unwrap().len()
    }
}

impl ExecutionEngine for FakeEngine {
    async fn prepare(&self, spec: &ContainerSpec) -> Result<Workspace> {
        let mut commands = self.commands.lock().unwrap();
        for command in &spec.setup {
            commands.push(command.clone());
        }
        Ok(Workspace::new(self.root.clone(), Vec::new()))
    }

    async fn exec(&self, _workspace: &Workspace, argv: &[String]) -> Result<ExecOutput> {
        let line = argv.join(" ");
        self.commands.lock().unwrap().push(argv.to_vec());
        if let Some(pattern) = &self.fail_on {
            if line.contains(pattern) {
                return Err(Error::Execution {
                    command: line,
                    reason: "exit status 1: nothing to commit, working tree clean".to_string(),
                });
            }
        }
        Ok(ExecOutput::default())
    }
}

/// Hosting API double that records every merge request it is asked to open.
pub struct FakeApi {
    created: Mutex<Vec<MergeRequest>>,
    next_iid: u64,
}

impl FakeApi {
    pub fn new(next_iid: u64) -> Self {
        Self {
            created: Mutex::new(Vec::new()),
            next_iid,
        }
    }

    pub fn created(&self) -> Vec<MergeRequest> {
        self.created.lock().unwrap().clone()
    }
}

impl MergeRequestApi for FakeApi {
    async fn create_merge_request(&self, merge_request: &MergeRequest) -> Result<u64> {
        self.created.lock().unwrap().push(merge_request.clone());
        Ok(self.next_iid)
    }
}

/// Seed a working tree with the values file the Helm updater reads.
pub fn seed_values_file(root: &Path, prod_revision: &str) {
    let dir = root.join("argocd");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("values.yaml"),
        format!(
            r#"environments:
  - name: prod
    argocd:
      helm:
        targetRevision: "{prod_revision}"
  - name: staging
    argocd:
      helm:
        targetRevision: "0.9.0"
"#
        ),
    )
    .unwrap();
}
