//! GitHub pull request reconciliation.
//!
//! Resolves PR references, detects existing agent replies, posts replies,
//! comments and reviews, and merges named sections into PR descriptions.
//!
//! # Modules
//!
//! - [`types`] - Core types for PR operations
//! - [`reference`] - PR number/URL resolution
//! - [`transport`] - The remote API seam and its `gh` implementation
//! - [`thread`] - Review thread inspection
//! - [`comment`] - Replies and general comments with the agent prefix
//! - [`review`] - Review validation and submission
//! - [`description`] - Section merging for PR descriptions

mod comment;
mod description;
mod reference;
mod review;
mod thread;
mod transport;
mod types;

pub use comment::{AgentPrefix, CommentPoster, ReplyOutcome, ReplyPolicy};
pub use description::{
    check_section_body, locate_section, merge_section, unescape_newlines, update_description,
    DescriptionOutcome, MergeAction, MergeResult, SectionSpan, SectionState,
};
pub use reference::{parse_pr_url, parse_remote_url, ReferenceResolver};
pub use review::{validate_comments, InlineCommentDraft, ReviewOutcome, ReviewPoster};
pub use thread::{has_agent_reply, inspect_thread, thread_members, ThreadReport};
pub use transport::{api_failure, parse_comment_pages, GhCli, GitHubApi};
pub use types::{Comment, DiffSide, InlineComment, PrReference, ReviewEvent, ReviewPayload};
