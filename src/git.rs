use crate::error::{AgentPrError, Result};
use std::process::Command;

/// Ambient local repository context used to resolve bare PR numbers.
pub trait RepoContext {
    /// URL of the configured remote (normally `origin`).
    fn remote_url(&self) -> Result<String>;
}

/// Repository context backed by the `git` binary in the current directory.
pub struct GitRepo {
    git_binary: String,
    remote: String,
}

impl GitRepo {
    pub fn new(git_binary: impl Into<String>, remote: impl Into<String>) -> Self {
        Self {
            git_binary: git_binary.into(),
            remote: remote.into(),
        }
    }
}

impl RepoContext for GitRepo {
    fn remote_url(&self) -> Result<String> {
        let output = Command::new(&self.git_binary)
            .args(["remote", "get-url", &self.remote])
            .output()
            .map_err(|e| {
                AgentPrError::Reference(format!("Failed to run {}: {}", self.git_binary, e))
            })?;

        if !output.status.success() {
            return Err(AgentPrError::Reference(
                "Not in a git repository and no full PR URL provided".to_string(),
            ));
        }

        let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if url.is_empty() {
            return Err(AgentPrError::Reference(format!(
                "Remote '{}' has no URL",
                self.remote
            )));
        }

        Ok(url)
    }
}
