//! Review thread inspection for duplicate-reply detection.

use tracing::warn;

use super::comment::AgentPrefix;
use super::transport::GitHubApi;
use super::types::{Comment, PrReference};

/// A review thread as observed on the remote PR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadReport {
    /// Root comment plus its direct replies, in API order.
    pub comments: Vec<Comment>,
    /// Whether any comment in the thread carries the agent prefix.
    pub already_replied: bool,
    /// Set when the comment list could not be fetched and the report is empty.
    pub fetch_failed: bool,
}

/// Collect the thread rooted at `root_id` and check for an agent reply.
///
/// The comment list is fetched once and filtered locally. A failed fetch
/// reports an empty thread with no agent reply.
pub fn inspect_thread(api: &dyn GitHubApi, pr: &PrReference, root_id: u64) -> ThreadReport {
    let all = match api.list_review_comments(pr) {
        Ok(comments) => comments,
        Err(e) => {
            warn!(%pr, root_id, error = %e, "could not fetch review comments; assuming no replies");
            return ThreadReport {
                comments: Vec::new(),
                already_replied: false,
                fetch_failed: true,
            };
        }
    };

    let comments = thread_members(all, root_id);
    let already_replied = has_agent_reply(&comments);

    ThreadReport {
        comments,
        already_replied,
        fetch_failed: false,
    }
}

/// Keep the root comment and every comment replying to it.
pub fn thread_members(comments: Vec<Comment>, root_id: u64) -> Vec<Comment> {
    comments
        .into_iter()
        .filter(|c| c.id == root_id || c.in_reply_to == Some(root_id))
        .collect()
}

/// True if any comment body starts with the agent marker.
pub fn has_agent_reply(comments: &[Comment]) -> bool {
    comments.iter().any(|c| AgentPrefix::is_agent_authored(&c.body))
}
