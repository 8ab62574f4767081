//! Test doubles shared across modules.
//!
//! [`FakeGitHub`] stands in for the `gh` transport and records every call so
//! tests can assert that no write happened. [`FakeRepo`] answers remote URL
//! lookups without a git checkout.

use std::cell::{Cell, RefCell};

use crate::error::{AgentPrError, Result};
use crate::gh::{Comment, GitHubApi, PrReference, ReviewPayload};
use crate::git::RepoContext;

/// Repository context with a scripted remote URL.
pub struct FakeRepo {
    remote: Option<String>,
    lookups: Cell<usize>,
}

impl FakeRepo {
    pub fn with_remote(url: &str) -> Self {
        Self {
            remote: Some(url.to_string()),
            lookups: Cell::new(0),
        }
    }

    pub fn without_remote() -> Self {
        Self {
            remote: None,
            lookups: Cell::new(0),
        }
    }

    /// Number of times the remote URL was requested.
    pub fn lookups(&self) -> usize {
        self.lookups.get()
    }
}

impl RepoContext for FakeRepo {
    fn remote_url(&self) -> Result<String> {
        self.lookups.set(self.lookups.get() + 1);
        self.remote.clone().ok_or_else(|| {
            AgentPrError::Reference(
                "Not in a git repository and no full PR URL provided".to_string(),
            )
        })
    }
}

/// A call made against [`FakeGitHub`].
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    ListReviewComments,
    PullRequestBody,
    ReplyToReviewComment { in_reply_to: u64, body: String },
    CreateIssueComment { body: String },
    CreateReview(ReviewPayload),
    UpdatePullRequestBody { body: String },
}

impl ApiCall {
    pub fn is_write(&self) -> bool {
        !matches!(self, ApiCall::ListReviewComments | ApiCall::PullRequestBody)
    }
}

/// In-memory GitHub with scripted state and failures.
pub struct FakeGitHub {
    comments: Vec<Comment>,
    description: RefCell<String>,
    read_failure: Option<(Option<u16>, String)>,
    write_failure: Option<(Option<u16>, String)>,
    calls: RefCell<Vec<ApiCall>>,
    next_id: Cell<u64>,
}

impl Default for FakeGitHub {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeGitHub {
    pub fn new() -> Self {
        Self {
            comments: Vec::new(),
            description: RefCell::new(String::new()),
            read_failure: None,
            write_failure: None,
            calls: RefCell::new(Vec::new()),
            next_id: Cell::new(1000),
        }
    }

    pub fn with_comments(mut self, comments: Vec<Comment>) -> Self {
        self.comments = comments;
        self
    }

    pub fn with_description(self, description: &str) -> Self {
        *self.description.borrow_mut() = description.to_string();
        self
    }

    pub fn failing_reads(mut self, status: Option<u16>, message: &str) -> Self {
        self.read_failure = Some((status, message.to_string()));
        self
    }

    pub fn failing_writes(mut self, status: Option<u16>, message: &str) -> Self {
        self.write_failure = Some((status, message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.borrow().clone()
    }

    pub fn writes(&self) -> Vec<ApiCall> {
        self.calls().into_iter().filter(ApiCall::is_write).collect()
    }

    pub fn description(&self) -> String {
        self.description.borrow().clone()
    }

    fn record(&self, call: ApiCall) {
        self.calls.borrow_mut().push(call);
    }

    fn read(&self) -> Result<()> {
        match &self.read_failure {
            Some((status, message)) => Err(AgentPrError::api(*status, message.clone())),
            None => Ok(()),
        }
    }

    fn write(&self) -> Result<u64> {
        if let Some((status, message)) = &self.write_failure {
            return Err(AgentPrError::api(*status, message.clone()));
        }
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        Ok(id)
    }
}

/// Shorthand for a review comment.
pub fn comment(id: u64, body: &str, in_reply_to: Option<u64>) -> Comment {
    Comment {
        id,
        body: body.to_string(),
        in_reply_to,
    }
}

/// A resolved reference for tests.
pub fn pr(number: u64) -> PrReference {
    PrReference {
        owner: "octo".to_string(),
        repo: "widgets".to_string(),
        number,
    }
}

impl GitHubApi for FakeGitHub {
    fn list_review_comments(&self, _pr: &PrReference) -> Result<Vec<Comment>> {
        self.record(ApiCall::ListReviewComments);
        self.read()?;
        Ok(self.comments.clone())
    }

    fn pull_request_body(&self, _pr: &PrReference) -> Result<String> {
        self.record(ApiCall::PullRequestBody);
        self.read()?;
        Ok(self.description())
    }

    fn reply_to_review_comment(
        &self,
        _pr: &PrReference,
        in_reply_to: u64,
        body: &str,
    ) -> Result<u64> {
        self.record(ApiCall::ReplyToReviewComment {
            in_reply_to,
            body: body.to_string(),
        });
        self.write()
    }

    fn create_issue_comment(&self, _pr: &PrReference, body: &str) -> Result<u64> {
        self.record(ApiCall::CreateIssueComment {
            body: body.to_string(),
        });
        self.write()
    }

    fn create_review(&self, _pr: &PrReference, payload: &ReviewPayload) -> Result<u64> {
        self.record(ApiCall::CreateReview(payload.clone()));
        self.write()
    }

    fn update_pull_request_body(&self, _pr: &PrReference, body: &str) -> Result<()> {
        self.record(ApiCall::UpdatePullRequestBody {
            body: body.to_string(),
        });
        self.write()?;
        *self.description.borrow_mut() = body.to_string();
        Ok(())
    }
}
