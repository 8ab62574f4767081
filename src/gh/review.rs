//! Review submission with inline comments.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::error::{AgentPrError, Result};

use super::transport::GitHubApi;
use super::types::{DiffSide, InlineComment, PrReference, ReviewEvent, ReviewPayload};

/// An inline comment as supplied by the caller, before validation.
///
/// Fields stay loosely typed so that a wrong type is reported as a
/// validation failure naming the field rather than a parse error.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct InlineCommentDraft {
    #[serde(default)]
    pub path: Option<Value>,
    #[serde(default)]
    pub line: Option<Value>,
    #[serde(default)]
    pub body: Option<Value>,
    #[serde(default)]
    pub side: Option<Value>,
    #[serde(default)]
    pub start_line: Option<Value>,
}

/// Result of a submitted review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewOutcome {
    pub review_id: u64,
    pub event: ReviewEvent,
}

/// Validate every draft, failing on the first offending comment.
pub fn validate_comments(drafts: &[InlineCommentDraft]) -> Result<Vec<InlineComment>> {
    drafts
        .iter()
        .enumerate()
        .map(|(index, draft)| validate_comment(index, draft))
        .collect()
}

fn validate_comment(index: usize, draft: &InlineCommentDraft) -> Result<InlineComment> {
    let path = required_text(index, "path", draft.path.as_ref())?;

    let line = match draft.line.as_ref() {
        None | Some(Value::Null) => {
            return Err(AgentPrError::validation(
                index,
                "line",
                "missing required field 'line'",
            ))
        }
        Some(value) => positive_line(value).ok_or_else(|| {
            AgentPrError::validation(index, "line", "'line' must be a positive integer")
        })?,
    };

    let body = required_text(index, "body", draft.body.as_ref())?;

    let side = match draft.side.as_ref() {
        None | Some(Value::Null) => None,
        Some(value) => Some(
            value
                .as_str()
                .and_then(|s| match s.to_ascii_uppercase().as_str() {
                    "LEFT" => Some(DiffSide::Left),
                    "RIGHT" => Some(DiffSide::Right),
                    _ => None,
                })
                .ok_or_else(|| {
                    AgentPrError::validation(index, "side", "'side' must be LEFT or RIGHT")
                })?,
        ),
    };

    let start_line = match draft.start_line.as_ref() {
        None | Some(Value::Null) => None,
        Some(value) => match positive_line(value) {
            Some(start) if start < line => Some(start),
            _ => {
                return Err(AgentPrError::validation(
                    index,
                    "start_line",
                    "'start_line' must be a positive integer less than 'line'",
                ))
            }
        },
    };

    Ok(InlineComment {
        path,
        line,
        body,
        side,
        start_line,
    })
}

fn required_text(index: usize, field: &str, value: Option<&Value>) -> Result<String> {
    match value {
        None | Some(Value::Null) => Err(AgentPrError::validation(
            index,
            field,
            format!("missing required field '{}'", field),
        )),
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
        Some(Value::String(_)) => Err(AgentPrError::validation(
            index,
            field,
            format!("'{}' cannot be empty", field),
        )),
        Some(_) => Err(AgentPrError::validation(
            index,
            field,
            format!("'{}' must be a string", field),
        )),
    }
}

fn positive_line(value: &Value) -> Option<u32> {
    value
        .as_u64()
        .filter(|n| *n >= 1)
        .and_then(|n| u32::try_from(n).ok())
}

pub struct ReviewPoster<'a> {
    api: &'a dyn GitHubApi,
}

impl<'a> ReviewPoster<'a> {
    pub fn new(api: &'a dyn GitHubApi) -> Self {
        Self { api }
    }

    /// Validate and submit a review in a single request.
    ///
    /// Nothing is sent unless every inline comment is valid.
    pub fn submit(
        &self,
        pr: &PrReference,
        event: ReviewEvent,
        body: &str,
        drafts: &[InlineCommentDraft],
    ) -> Result<ReviewOutcome> {
        let comments = validate_comments(drafts)?;
        let payload = ReviewPayload {
            event,
            body: body.to_string(),
            comments,
        };

        let review_id = self.api.create_review(pr, &payload)?;
        info!(%pr, review_id, %event, comments = payload.comments.len(), "review posted");

        Ok(ReviewOutcome { review_id, event })
    }
}
