//! Posting replies and general comments with the agent prefix.

use serde::Serialize;
use tracing::{info, warn};

use crate::error::{AgentPrError, Result};

use super::thread::inspect_thread;
use super::transport::GitHubApi;
use super::types::PrReference;

/// Marks text authored by an agent: `[🤖 NAME]: body`.
///
/// Detection only looks at the leading `[🤖`, so replies from any agent
/// name count, and a human comment starting the same way is misread as an
/// agent reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentPrefix {
    name: String,
}

impl AgentPrefix {
    pub const MARKER: &'static str = "[🤖";

    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn format(&self, body: &str) -> String {
        format!("{} {}]: {}", Self::MARKER, self.name, body)
    }

    pub fn is_agent_authored(body: &str) -> bool {
        body.trim().starts_with(Self::MARKER)
    }
}

/// Duplicate-prevention switches for thread replies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplyPolicy {
    /// Inspect the thread and report; never write.
    pub check_only: bool,
    /// Post even when an agent reply already exists.
    pub force: bool,
}

/// What a reply or comment request ended up doing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ReplyOutcome {
    Posted {
        comment_id: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        in_reply_to: Option<u64>,
    },
    AlreadyReplied {
        comment_id: u64,
    },
    NoReplyFound {
        comment_id: u64,
    },
}

pub struct CommentPoster<'a> {
    api: &'a dyn GitHubApi,
    prefix: AgentPrefix,
}

impl<'a> CommentPoster<'a> {
    pub fn new(api: &'a dyn GitHubApi, prefix: AgentPrefix) -> Self {
        Self { api, prefix }
    }

    /// Reply to the review thread rooted at `root_id`.
    ///
    /// `message` is the raw text; the agent prefix is added here. It may be
    /// `None` only for check-only requests.
    pub fn reply(
        &self,
        pr: &PrReference,
        root_id: u64,
        message: Option<&str>,
        policy: ReplyPolicy,
    ) -> Result<ReplyOutcome> {
        let report = inspect_thread(self.api, pr, root_id);

        if report.already_replied {
            if policy.check_only {
                info!(%pr, root_id, "agent already replied");
                return Ok(ReplyOutcome::AlreadyReplied {
                    comment_id: root_id,
                });
            }
            if !policy.force {
                return Err(AgentPrError::DuplicateReply {
                    comment_id: root_id,
                });
            }
            warn!(%pr, root_id, "posting duplicate reply (force)");
        }

        if policy.check_only {
            return Ok(ReplyOutcome::NoReplyFound {
                comment_id: root_id,
            });
        }

        let message = require_message(message)?;
        let body = self.prefix.format(message);
        let comment_id = self.api.reply_to_review_comment(pr, root_id, &body)?;
        info!(%pr, root_id, comment_id, "reply posted");

        Ok(ReplyOutcome::Posted {
            comment_id,
            in_reply_to: Some(root_id),
        })
    }

    /// Post a general issue-level comment on the PR.
    pub fn comment(&self, pr: &PrReference, message: &str) -> Result<ReplyOutcome> {
        let message = require_message(Some(message))?;
        let body = self.prefix.format(message);
        let comment_id = self.api.create_issue_comment(pr, &body)?;
        info!(%pr, comment_id, "issue comment posted");

        Ok(ReplyOutcome::Posted {
            comment_id,
            in_reply_to: None,
        })
    }
}

fn require_message(message: Option<&str>) -> Result<&str> {
    match message {
        Some(m) if !m.trim().is_empty() => Ok(m),
        _ => Err(AgentPrError::Input(
            "body is required unless using check_only".to_string(),
        )),
    }
}
