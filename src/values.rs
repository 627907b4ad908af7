//! Structured access to Helm values files.
//!
//! Values files are edited through typed YAML traversal rather than by
//! templating shell expressions for an external query tool, so untrusted
//! environment names can never change the meaning of a query.

use crate::error::{Error, Result};
use serde_yaml::Value;
use std::path::Path;

/// Relative path of the values file consumed by the Helm revision updater
pub const HELM_VALUES_FILE: &str = "argocd/values.yaml";

/// A parsed values document
#[derive(Debug, Clone)]
pub struct ValuesFile {
    doc: Value,
}

impl ValuesFile {
    /// Load a values file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse a values document from a YAML string
    pub fn parse(yaml: &str) -> Result<Self> {
        Ok(Self {
            doc: serde_yaml::from_str(yaml)?,
        })
    }

    /// Write the document back to disk
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let rendered = serde_yaml::to_string(&self.doc)?;
        std::fs::write(path.as_ref(), rendered)?;
        Ok(())
    }

    /// Get a value by dotted path (e.g. `image.tag`)
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut current = &self.doc;
        for part in path.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// Set a value by dotted path, creating intermediate mappings as needed
    pub fn set(&mut self, path: &str, value: Value) -> Result<()> {
        if path.is_empty() {
            return Err(Error::Values {
                reason: "empty field path".to_string(),
            });
        }

        let mut current = &mut self.doc;
        let parts: Vec<&str> = path.split('.').collect();
        for (i, part) in parts.iter().enumerate() {
            let map = current.as_mapping_mut().ok_or_else(|| Error::Values {
                reason: format!(
                    "`{}` is not a mapping",
                    parts[..i].join(".")
                ),
            })?;
            let key = Value::String(part.to_string());
            if i == parts.len() - 1 {
                map.insert(key, value);
                return Ok(());
            }
            current = map
                .entry(key)
                .or_insert_with(|| Value::Mapping(Default::default()));
        }
        unreachable!("path has at least one part");
    }

    /// Currently deployed Helm revision for the named environment.
    ///
    /// Reads `environments[] | select(name == env) .argocd.helm.targetRevision`.
    pub fn environment_revision(&self, env: &str) -> Result<String> {
        let entry = self.environment(env)?;
        entry
            .get("argocd")
            .and_then(|v| v.get("helm"))
            .and_then(|v| v.get("targetRevision"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::Values {
                reason: format!("environment `{env}` has no argocd.helm.targetRevision"),
            })
    }

    /// Rewrite the Helm revision for the named environment, leaving every
    /// other environment untouched.
    pub fn set_environment_revision(&mut self, env: &str, revision: &str) -> Result<()> {
        let entry = self.environment_mut(env)?;
        let target = entry
            .get_mut("argocd")
            .and_then(|v| v.get_mut("helm"))
            .and_then(|v| v.get_mut("targetRevision"))
            .ok_or_else(|| Error::Values {
                reason: format!("environment `{env}` has no argocd.helm.targetRevision"),
            })?;
        *target = Value::String(revision.to_string());
        Ok(())
    }

    fn environments(&self) -> Result<&Vec<Value>> {
        self.doc
            .get("environments")
            .and_then(Value::as_sequence)
            .ok_or_else(|| Error::Values {
                reason: "no `environments` sequence in values file".to_string(),
            })
    }

    fn environment(&self, env: &str) -> Result<&Value> {
        self.environments()?
            .iter()
            .find(|e| e.get("name").and_then(Value::as_str) == Some(env))
            .ok_or_else(|| Error::Values {
                reason: format!("environment `{env}` not found"),
            })
    }

    fn environment_mut(&mut self, env: &str) -> Result<&mut Value> {
        self.doc
            .get_mut("environments")
            .and_then(Value::as_sequence_mut)
            .ok_or_else(|| Error::Values {
                reason: "no `environments` sequence in values file".to_string(),
            })?
            .iter_mut()
            .find(|e| e.get("name").and_then(Value::as_str) == Some(env))
            .ok_or_else(|| Error::Values {
                reason: format!("environment `{env}` not found"),
            })
    }
}
