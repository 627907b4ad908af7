//! Prepared git execution environments.
//!
//! Builds the [`ContainerSpec`] every git action runs in: the SSH key
//! mounted readable by owner only, non-interactive SSH, a cache-defeating
//! timestamp, and the bot identity configured globally. Construction is pure;
//! failures surface when the engine materializes the spec.

use super::{ContainerSpec, FileMount, ROOT_TOKEN, argv};
use std::path::PathBuf;

/// Base image the prepared environment is rooted in, for engines that run
/// real containers.
pub const BASE_IMAGE: &str = "alpine:3.20";

/// Where the SSH key is mounted, relative to the environment root.
///
/// Kept outside the working tree so `git add .` can never stage it.
pub const SSH_KEY_MOUNT: &str = "ssh/id";

/// Git author/committer identity used for automated commits
#[derive(Debug, Clone)]
pub struct GitIdentity {
    /// Git user name
    pub name: String,
    /// Git user email
    pub email: String,
}

impl Default for GitIdentity {
    fn default() -> Self {
        Self {
            name: "gitops-bot".to_string(),
            email: "gitops-bot@example.com".to_string(),
        }
    }
}

impl GitIdentity {
    /// Identity with the given overrides, falling back to the bot identity
    /// for whichever part is absent.
    pub fn with_overrides(name: Option<&str>, email: Option<&str>) -> Self {
        let default = Self::default();
        Self {
            name: name.map(str::to_string).unwrap_or(default.name),
            email: email.map(str::to_string).unwrap_or(default.email),
        }
    }
}

/// Build the execution environment for git-over-SSH commands.
///
/// The `CACHE_BUSTER` variable is seeded with the current timestamp on every
/// call so layer-caching engines re-run the commands each invocation.
pub fn prepare_git_container(key: &[u8], identity: &GitIdentity) -> ContainerSpec {
    let key_path = format!("{ROOT_TOKEN}/{SSH_KEY_MOUNT}");

    ContainerSpec {
        image: BASE_IMAGE.to_string(),
        mounts: vec![FileMount {
            dest: PathBuf::from(SSH_KEY_MOUNT),
            contents: key.to_vec(),
            mode: 0o400,
        }],
        env: vec![
            (
                "GIT_SSH_COMMAND".to_string(),
                format!("ssh -i {key_path} -o StrictHostKeyChecking=no"),
            ),
            (
                "CACHE_BUSTER".to_string(),
                chrono::Utc::now().to_rfc3339(),
            ),
        ],
        setup: vec![
            argv(["git", "config", "--global", "user.name", &identity.name]),
            argv(["git", "config", "--global", "user.email", &identity.email]),
            argv([
                "git",
                "config",
                "--global",
                "--add",
                "--bool",
                "push.autoSetupRemote",
                "true",
            ]),
        ],
        source_dir: None,
    }
}
