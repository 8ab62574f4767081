//! Reply command handler.

use tracing::debug;

use super::Context;
use crate::error::Result;
use crate::gh::{AgentPrefix, CommentPoster, ReplyOutcome};
use crate::output::{print_info, print_progress, print_success, print_warning};
use crate::request::{ReplyRequest, ReplyTarget};

/// Reply to a review thread or answer in the PR conversation.
///
/// Thread replies go through duplicate detection; with `check_only` the
/// outcome is only reported. Conversation comments have no thread to
/// inspect and are always posted.
pub fn reply_command(ctx: &Context<'_>, request: ReplyRequest) -> Result<ReplyOutcome> {
    let pr = ctx.resolve(&request.pr)?;
    let name = request
        .name
        .unwrap_or_else(|| ctx.config.agent_name.clone());
    debug!(%pr, agent = %name, "resolved reply target");

    let poster = CommentPoster::new(ctx.api, AgentPrefix::new(name));

    let outcome = match request.target {
        ReplyTarget::Thread { comment_id } => {
            if !request.policy.check_only {
                print_progress(&format!("Replying to comment {} on {}", comment_id, pr));
            }
            poster.reply(&pr, comment_id, request.body.as_deref(), request.policy)?
        }
        ReplyTarget::Conversation { issue_comment_id } => {
            print_progress(&format!(
                "Posting comment on {} (answering {})",
                pr, issue_comment_id
            ));
            // Issue comments carry no thread; the body is guaranteed present here.
            poster.comment(&pr, request.body.as_deref().unwrap_or_default())?
        }
    };

    match &outcome {
        ReplyOutcome::Posted { comment_id, .. } => {
            print_success(&format!("Posted comment {}", comment_id));
        }
        ReplyOutcome::AlreadyReplied { comment_id } => {
            print_warning(&format!(
                "An agent has already replied to comment {}",
                comment_id
            ));
        }
        ReplyOutcome::NoReplyFound { comment_id } => {
            print_info(&format!("No agent reply found for comment {}", comment_id));
        }
    }

    Ok(outcome)
}
