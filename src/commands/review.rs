//! Review command handler.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use super::Context;
use crate::error::{AgentPrError, Result};
use crate::gh::{
    AgentPrefix, CommentPoster, ReplyOutcome, ReplyPolicy, ReviewOutcome, ReviewPoster,
};
use crate::output::{print_progress, print_success};
use crate::request::ReviewRequest;

/// Result of the review command: a submitted review or a thread reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReviewResult {
    Review {
        action: &'static str,
        #[serde(flatten)]
        outcome: ReviewOutcome,
    },
    Reply(ReplyOutcome),
}

/// Read the inline comments array from a JSON file.
///
/// A missing file is an input error; content that is not JSON is reported
/// as invalid comments.
pub fn load_comments_file(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        AgentPrError::Input(format!(
            "Cannot read comments file {}: {}",
            path.display(),
            e
        ))
    })?;

    serde_json::from_str(&content).map_err(|e| {
        AgentPrError::invalid_comments(format!(
            "Comments file {} is not valid JSON: {}",
            path.display(),
            e
        ))
    })
}

/// Submit a review, or reply to a review comment when `reply_to` was given.
pub fn review_command(ctx: &Context<'_>, request: ReviewRequest) -> Result<ReviewResult> {
    match request {
        ReviewRequest::Submit {
            pr,
            event,
            body,
            comments,
        } => {
            let pr = ctx.resolve(&pr)?;
            print_progress(&format!(
                "Submitting {} review on {} with {} inline comment(s)",
                event,
                pr,
                comments.len()
            ));

            let outcome = ReviewPoster::new(ctx.api).submit(&pr, event, &body, &comments)?;
            print_success(&format!("Posted review {}", outcome.review_id));

            Ok(ReviewResult::Review {
                action: "posted",
                outcome,
            })
        }
        ReviewRequest::Reply { pr, reply_to, body } => {
            let pr = ctx.resolve(&pr)?;
            print_progress(&format!("Replying to comment {} on {}", reply_to, pr));

            let prefix = AgentPrefix::new(ctx.config.agent_name.as_str());
            let poster = CommentPoster::new(ctx.api, prefix);
            let outcome = poster.reply(&pr, reply_to, Some(&body), ReplyPolicy::default())?;
            if let ReplyOutcome::Posted { comment_id, .. } = &outcome {
                print_success(&format!("Posted comment {}", comment_id));
            }

            Ok(ReviewResult::Reply(outcome))
        }
    }
}
