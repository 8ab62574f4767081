//! Caller requests for each operation.
//!
//! Each command accepts an `*Input` (from JSON on stdin or from CLI flags)
//! and turns it into a validated `*Request` once, before any network call.
//! JSON field names follow the helper scripts agents already use:
//!
//! ```json
//! {"pr": "123", "comment_id": 456, "body": "Fixed in abc123"}
//! ```

use std::io::Read;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{AgentPrError, Result};
use crate::gh::{InlineCommentDraft, ReplyPolicy, ReviewEvent};

/// Accept the PR reference as either a string or a bare JSON number.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}

/// Read one JSON document from `reader`.
pub fn read_json_input<T: DeserializeOwned, R: Read>(reader: R) -> Result<T> {
    Ok(serde_json::from_reader(reader)?)
}

fn require_pr(pr: Option<String>) -> Result<String> {
    match pr {
        Some(pr) if !pr.trim().is_empty() => Ok(pr.trim().to_string()),
        _ => Err(AgentPrError::Input(
            "Missing required field 'pr' or 'pr_ref'".to_string(),
        )),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ============================================================================
// Reply
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReplyInput {
    #[serde(default, alias = "pr_ref", deserialize_with = "string_or_number")]
    pub pr: Option<String>,
    #[serde(default)]
    pub comment_id: Option<u64>,
    #[serde(default)]
    pub issue_comment_id: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub check_only: bool,
    #[serde(default)]
    pub force: bool,
}

/// Where a reply goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyTarget {
    /// A review comment thread, identified by its root comment.
    Thread { comment_id: u64 },
    /// The PR conversation, answering an issue comment.
    Conversation { issue_comment_id: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplyRequest {
    pub pr: String,
    pub target: ReplyTarget,
    pub name: Option<String>,
    pub body: Option<String>,
    pub policy: ReplyPolicy,
}

impl ReplyInput {
    pub fn into_request(self) -> Result<ReplyRequest> {
        let pr = require_pr(self.pr)?;

        let target = match (self.comment_id, self.issue_comment_id) {
            (Some(comment_id), None) => ReplyTarget::Thread { comment_id },
            (None, Some(issue_comment_id)) => ReplyTarget::Conversation { issue_comment_id },
            (Some(_), Some(_)) => {
                return Err(AgentPrError::Input(
                    "Specify only one of 'comment_id' or 'issue_comment_id'".to_string(),
                ))
            }
            (None, None) => {
                return Err(AgentPrError::Input(
                    "Must specify 'comment_id' or 'issue_comment_id'".to_string(),
                ))
            }
        };

        let body = non_empty(self.body);
        if !self.check_only && body.is_none() {
            return Err(AgentPrError::Input(
                "'body' is required unless using check_only".to_string(),
            ));
        }

        if self.check_only && matches!(target, ReplyTarget::Conversation { .. }) {
            return Err(AgentPrError::Input(
                "check_only requires 'comment_id' (issue comments have no threads)".to_string(),
            ));
        }

        let name = non_empty(self.name);
        if name.as_deref().is_some_and(|n| n.contains(']')) {
            return Err(AgentPrError::Input(
                "'name' must not contain ']'".to_string(),
            ));
        }

        Ok(ReplyRequest {
            pr,
            target,
            name,
            body,
            policy: ReplyPolicy {
                check_only: self.check_only,
                force: self.force,
            },
        })
    }
}

// ============================================================================
// Review
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReviewInput {
    #[serde(default, alias = "pr_ref", deserialize_with = "string_or_number")]
    pub pr: Option<String>,
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub comments: Option<Value>,
    #[serde(default)]
    pub reply_to: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReviewRequest {
    Submit {
        pr: String,
        event: ReviewEvent,
        body: String,
        comments: Vec<InlineCommentDraft>,
    },
    Reply {
        pr: String,
        reply_to: u64,
        body: String,
    },
}

impl ReviewInput {
    pub fn into_request(self) -> Result<ReviewRequest> {
        let pr = require_pr(self.pr)?;

        if let Some(reply_to) = self.reply_to {
            let body = non_empty(self.body).ok_or_else(|| {
                AgentPrError::Input("'body' is required when using reply_to".to_string())
            })?;
            return Ok(ReviewRequest::Reply { pr, reply_to, body });
        }

        let event = match non_empty(self.event) {
            Some(event) => event.parse::<ReviewEvent>().map_err(AgentPrError::Input)?,
            None => {
                return Err(AgentPrError::Input(
                    "'event' is required (unless using reply_to)".to_string(),
                ))
            }
        };

        let comments = match self.comments {
            None | Some(Value::Null) => Vec::new(),
            Some(value) => parse_comment_drafts(value)?,
        };

        Ok(ReviewRequest::Submit {
            pr,
            event,
            body: self.body.unwrap_or_default(),
            comments,
        })
    }
}

/// Split a JSON comments array into per-comment drafts.
pub fn parse_comment_drafts(value: Value) -> Result<Vec<InlineCommentDraft>> {
    let Value::Array(items) = value else {
        return Err(AgentPrError::invalid_comments(
            "'comments' must be a JSON array",
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            if !item.is_object() {
                return Err(AgentPrError::validation(
                    index,
                    "comment",
                    "must be a JSON object",
                ));
            }
            serde_json::from_value(item).map_err(|e| {
                AgentPrError::validation(index, "comment", format!("invalid comment: {}", e))
            })
        })
        .collect()
}

// ============================================================================
// Description
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DescriptionInput {
    #[serde(default, alias = "pr_ref", deserialize_with = "string_or_number")]
    pub pr: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub replace: bool,
    #[serde(default)]
    pub header: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionRequest {
    pub pr: String,
    pub summary: String,
    pub replace: bool,
    pub header: Option<String>,
}

impl DescriptionInput {
    pub fn into_request(self) -> Result<DescriptionRequest> {
        let pr = require_pr(self.pr)?;
        let summary = non_empty(self.summary)
            .ok_or_else(|| AgentPrError::Input("Missing required field 'summary'".to_string()))?;

        let header = non_empty(self.header);
        if header.as_deref().is_some_and(|h| h.contains('\n')) {
            return Err(AgentPrError::Input(
                "'header' must be a single line".to_string(),
            ));
        }

        Ok(DescriptionRequest {
            pr,
            summary,
            replace: self.replace,
            header,
        })
    }
}
