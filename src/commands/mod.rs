//! CLI command handlers for agent-pr.
//!
//! Each handler takes an already validated request plus a [`Context`] that
//! bundles the configuration and the two external seams (the GitHub API and
//! the local repository), so handlers run the same against `gh` and against
//! test doubles.
//!
//! # Commands
//!
//! - [`reply`] - Reply to review threads or post conversation comments
//! - [`review`] - Submit reviews with inline comments
//! - [`describe`] - Maintain a section of the PR description
//! - [`config`] - Show or initialize configuration

mod config;
mod describe;
mod reply;
mod review;

pub use config::{config_display_command, config_init_command};
pub use describe::describe_command;
pub use reply::reply_command;
pub use review::{load_comments_file, review_command, ReviewResult};

use std::io::{self, IsTerminal};

use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::{AgentPrError, Result};
use crate::gh::{GitHubApi, PrReference, ReferenceResolver};
use crate::git::RepoContext;
use crate::request::read_json_input;

/// Everything a command needs beyond its request.
pub struct Context<'a> {
    pub config: &'a Config,
    pub api: &'a dyn GitHubApi,
    pub repo: &'a dyn RepoContext,
}

impl<'a> Context<'a> {
    pub fn new(config: &'a Config, api: &'a dyn GitHubApi, repo: &'a dyn RepoContext) -> Self {
        Self { config, api, repo }
    }

    /// Resolve a PR number or URL against the configured host and remote.
    pub fn resolve(&self, reference: &str) -> Result<PrReference> {
        ReferenceResolver::new(&self.config.host, self.repo).resolve(reference)
    }
}

/// Use the request built from CLI arguments, or read JSON from stdin.
///
/// Refuses to block on an interactive terminal.
pub fn input_or_stdin<T: DeserializeOwned>(from_args: Option<T>) -> Result<T> {
    if let Some(input) = from_args {
        return Ok(input);
    }

    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Err(AgentPrError::Input(
            "No PR reference given. Pass it as an argument or pipe a JSON request on stdin."
                .to_string(),
        ));
    }

    read_json_input(stdin.lock())
}
