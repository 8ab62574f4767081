//! Command-line interface definition.

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};

use crate::error::{AgentPrError, Result};
use crate::request::{DescriptionInput, ReplyInput, ReviewInput};

#[derive(Parser, Debug)]
#[command(name = "agent-pr")]
#[command(
    version,
    about = "Idempotent pull request replies, reviews and description updates for automated agents",
    after_help = "EXAMPLES:
    # Reply to a review thread (refuses if an agent already replied)
    agent-pr reply 123 --comment-id 456 --body \"Fixed in abc123\"

    # Same request as JSON on stdin
    echo '{\"pr\": \"123\", \"comment_id\": 456, \"body\": \"Fixed\"}' | agent-pr reply

    # Post a review with inline comments
    agent-pr review 123 --event COMMENT --comments-file comments.json

    # Record addressed comments in the PR description
    agent-pr describe 123 --summary \"- Fixed null check\\n- Added tests\"

OUTPUT:
    stdout: one JSON document, {\"status\": \"ok\", ...} or {\"error\": ...}
    stderr: human-readable progress

EXIT CODES:
    0  success (including check-only results)
    1  invalid input or unresolvable PR reference
    2  GitHub API error
    3  duplicate reply or invalid review comments"
)]
pub struct Cli {
    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a config file (default: ~/.config/agent-pr/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reply to a review comment thread or post a PR conversation comment
    #[command(after_help = "DUPLICATE PREVENTION:
    Before replying to a review thread, the thread is scanned for a comment
    starting with the agent prefix [🤖 ...]. If one exists the reply is
    refused (exit 3) unless --force is given. --check-only only reports.")]
    Reply(ReplyArgs),

    /// Submit a review (APPROVE, REQUEST_CHANGES, COMMENT) with inline comments
    #[command(after_help = "COMMENTS FILE:
    A JSON array of inline comments:
    [{\"path\": \"src/lib.rs\", \"line\": 42, \"body\": \"...\"}]
    Optional per comment: \"side\" (LEFT/RIGHT), \"start_line\" (< line).")]
    Review(ReviewArgs),

    /// Add to or replace a named section of the PR description
    Describe(DescribeArgs),

    /// Show the effective configuration, or create a default config file
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },

    /// Output shell completion script to stdout (hidden utility command)
    #[command(hide = true)]
    Completions {
        /// Shell type to generate completions for (bash, zsh, or fish)
        shell: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Write a commented default config file if none exists
    Init,
}

#[derive(Args, Debug, Default)]
pub struct ReplyArgs {
    /// PR number or URL (omit to read a JSON request from stdin)
    pub pr: Option<String>,

    /// Review comment id whose thread to reply to
    #[arg(long, conflicts_with = "issue_comment_id")]
    pub comment_id: Option<u64>,

    /// Issue comment id to answer with a general PR comment
    #[arg(long)]
    pub issue_comment_id: Option<u64>,

    /// Reply text (the agent prefix is added automatically)
    #[arg(long, allow_hyphen_values = true)]
    pub body: Option<String>,

    /// Agent name for the prefix (overrides config)
    #[arg(long)]
    pub name: Option<String>,

    /// Only report whether an agent already replied
    #[arg(long)]
    pub check_only: bool,

    /// Reply even if an agent already replied
    #[arg(long)]
    pub force: bool,
}

impl ReplyArgs {
    /// The request given on the command line, if a PR was named there.
    pub fn into_input(self) -> Result<Option<ReplyInput>> {
        let Some(pr) = self.pr else {
            let flagged = self.comment_id.is_some()
                || self.issue_comment_id.is_some()
                || self.body.is_some()
                || self.name.is_some()
                || self.check_only
                || self.force;
            return flags_without_pr(flagged);
        };
        Ok(Some(ReplyInput {
            pr: Some(pr),
            comment_id: self.comment_id,
            issue_comment_id: self.issue_comment_id,
            name: self.name,
            body: self.body,
            check_only: self.check_only,
            force: self.force,
        }))
    }
}

#[derive(Args, Debug, Default)]
pub struct ReviewArgs {
    /// PR number or URL (omit to read a JSON request from stdin)
    pub pr: Option<String>,

    /// Review event: APPROVE, REQUEST_CHANGES, or COMMENT
    #[arg(long)]
    pub event: Option<String>,

    /// Review summary body (optional)
    #[arg(long, allow_hyphen_values = true)]
    pub body: Option<String>,

    /// JSON file containing an array of inline comments
    #[arg(long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub comments_file: Option<PathBuf>,

    /// Reply to this review comment instead of posting a review
    #[arg(long, conflicts_with_all = ["event", "comments_file"])]
    pub reply_to: Option<u64>,
}

impl ReviewArgs {
    /// The request given on the command line, if a PR was named there.
    ///
    /// The comments file is read by the review command, not here.
    pub fn into_input(self) -> Result<Option<(ReviewInput, Option<PathBuf>)>> {
        let Some(pr) = self.pr else {
            let flagged = self.event.is_some()
                || self.body.is_some()
                || self.comments_file.is_some()
                || self.reply_to.is_some();
            return flags_without_pr(flagged);
        };
        Ok(Some((
            ReviewInput {
                pr: Some(pr),
                event: self.event,
                body: self.body,
                comments: None,
                reply_to: self.reply_to,
            },
            self.comments_file,
        )))
    }
}

#[derive(Args, Debug, Default)]
pub struct DescribeArgs {
    /// PR number or URL (omit to read a JSON request from stdin)
    pub pr: Option<String>,

    /// Section body; literal \n sequences become newlines
    #[arg(long, allow_hyphen_values = true)]
    pub summary: Option<String>,

    /// Replace the existing section instead of appending to it
    #[arg(long)]
    pub replace: bool,

    /// Section header (default from config: "## Comments Addressed")
    #[arg(long)]
    pub header: Option<String>,
}

impl DescribeArgs {
    /// The request given on the command line, if a PR was named there.
    pub fn into_input(self) -> Result<Option<DescriptionInput>> {
        let Some(pr) = self.pr else {
            let flagged = self.summary.is_some() || self.replace || self.header.is_some();
            return flags_without_pr(flagged);
        };
        Ok(Some(DescriptionInput {
            pr: Some(pr),
            summary: self.summary,
            replace: self.replace,
            header: self.header,
        }))
    }
}

/// Request flags only make sense next to a PR argument; without one the
/// request is read from stdin and the flags would be ignored.
fn flags_without_pr<T>(flagged: bool) -> Result<Option<T>> {
    if flagged {
        return Err(AgentPrError::Input(
            "Request flags require a PR argument (or send the whole request as JSON on stdin)"
                .to_string(),
        ));
    }
    Ok(None)
}

/// Convert a clap parse failure into an input error.
///
/// Help and version output are not failures and yield `None`; the caller
/// lets clap print them.
pub fn usage_error(err: &clap::Error) -> Option<AgentPrError> {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => None,
        ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => Some(AgentPrError::Input(
            "No subcommand given. Run with --help for usage.".to_string(),
        )),
        _ => {
            let rendered = err.render().to_string();
            let first = rendered.lines().next().unwrap_or_default().trim();
            let message = first.strip_prefix("error:").unwrap_or(first).trim();
            Some(AgentPrError::Input(message.to_string()))
        }
    }
}
