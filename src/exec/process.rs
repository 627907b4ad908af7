//! Process-backed execution engine.
//!
//! The pipeline runtime already places this module inside a container, so the
//! default engine materializes a [`ContainerSpec`] into an isolated directory
//! on the local filesystem and runs each command as a child process. The
//! `image` field of the spec is ignored here; it is meaningful only to
//! engines that launch their own containers.

use super::{ContainerSpec, ExecOutput, ExecutionEngine, ROOT_TOKEN, Workspace};
use crate::error::{Error, Result};
use std::path::Path;
use tokio::process::Command;

/// Execution engine running commands as local child processes
#[derive(Debug, Default)]
pub struct ProcessEngine;

impl ProcessEngine {
    /// Create a new process engine
    pub fn new() -> Self {
        Self
    }

    fn write_mounts(spec: &ContainerSpec, root: &Path) -> Result<()> {
        for mount in &spec.mounts {
            let dest = root.join(&mount.dest);
            if let Some(parent) = dest.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&dest, &mount.contents)?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(&dest, std::fs::Permissions::from_mode(mount.mode))?;
            }
        }
        Ok(())
    }
}

impl ExecutionEngine for ProcessEngine {
    async fn prepare(&self, spec: &ContainerSpec) -> Result<Workspace> {
        let tmp = tempfile::Builder::new().prefix("gitops-").tempdir()?;
        let root = tmp.path().to_path_buf();

        Self::write_mounts(spec, &root)?;

        let workdir = match &spec.source_dir {
            Some(dir) => {
                if !dir.is_dir() {
                    return Err(Error::invalid_argument(format!(
                        "workdir source {} is not a directory",
                        dir.display()
                    )));
                }
                dir.clone()
            }
            None => {
                let dir = root.join("repo");
                std::fs::create_dir_all(&dir)?;
                dir
            }
        };

        // Scope `git config --global` writes to this run.
        let home = root.join("home");
        std::fs::create_dir_all(&home)?;

        let root_str = root.to_string_lossy();
        let mut env: Vec<(String, String)> = spec
            .env
            .iter()
            .map(|(k, v)| (k.clone(), v.replace(ROOT_TOKEN, &root_str)))
            .collect();
        if !env.iter().any(|(k, _)| k == "HOME") {
            env.push(("HOME".to_string(), home.to_string_lossy().into_owned()));
        }

        let workspace = Workspace::with_tempdir(workdir, env, tmp);
        for command in &spec.setup {
            self.exec(&workspace, command).await?;
        }
        Ok(workspace)
    }

    async fn exec(&self, workspace: &Workspace, argv: &[String]) -> Result<ExecOutput> {
        let Some((program, args)) = argv.split_first() else {
            return Err(Error::invalid_argument("empty command"));
        };
        let command_line = argv.join(" ");

        if which::which(program).is_err() {
            return Err(Error::Execution {
                command: command_line,
                reason: format!("`{program}` not found in PATH"),
            });
        }

        log::debug!("exec: {command_line}");

        let output = Command::new(program)
            .args(args)
            .current_dir(workspace.root())
            .envs(workspace.env().iter().map(|(k, v)| (k, v)))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| Error::Execution {
                command: command_line.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Execution {
                command: command_line,
                reason: format!(
                    "exit status {}: {}",
                    output.status.code().unwrap_or(-1),
                    stderr.trim()
                ),
            });
        }

        Ok(ExecOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::argv;

    #[tokio::test]
    async fn prepare_writes_mounts_and_substitutes_root() {
        let mut spec = ContainerSpec::default();
        spec.mounts.push(crate::exec::FileMount {
            dest: "ssh/id".into(),
            contents: b"key-material".to_vec(),
            mode: 0o400,
        });
        spec.env
            .push(("KEY_PATH".to_string(), format!("{ROOT_TOKEN}/ssh/id")));

        let engine = ProcessEngine::new();
        let ws = engine.prepare(&spec).await.unwrap();

        let key_path = ws
            .env()
            .iter()
            .find(|(k, _)| k == "KEY_PATH")
            .map(|(_, v)| v.clone())
            .unwrap();
        assert!(!key_path.contains(ROOT_TOKEN));
        assert_eq!(std::fs::read(&key_path).unwrap(), b"key-material");
        assert!(ws.env().iter().any(|(k, _)| k == "HOME"));
    }

    #[tokio::test]
    async fn exec_fails_on_nonzero_exit() {
        let engine = ProcessEngine::new();
        let ws = engine.prepare(&ContainerSpec::default()).await.unwrap();

        let err = engine
            .exec(&ws, &argv(["sh", "-c", "echo boom >&2; exit 3"]))
            .await
            .unwrap_err();
        match err {
            Error::Execution { reason, .. } => {
                assert!(reason.contains("exit status 3"));
                assert!(reason.contains("boom"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn exec_reports_missing_binary() {
        let engine = ProcessEngine::new();
        let ws = engine.prepare(&ContainerSpec::default()).await.unwrap();

        let err = engine
            .exec(&ws, &argv(["definitely-not-a-real-binary"]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Execution { .. }));
    }
}
