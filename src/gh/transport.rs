//! Remote API transport.
//!
//! [`GitHubApi`] is the seam between the reconciliation logic and GitHub.
//! [`GhCli`] implements it on top of `gh api`, sending every write as one
//! JSON document on stdin so inline comment arrays keep their structure.

use std::io::Write;
use std::process::{Command, Stdio};

use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{AgentPrError, Result};

use super::types::{Comment, PrReference, ReviewPayload};

/// The six remote operations the core depends on.
pub trait GitHubApi {
    /// All review comments on the pull request, every page.
    fn list_review_comments(&self, pr: &PrReference) -> Result<Vec<Comment>>;

    /// Current description text (empty when the PR has none).
    fn pull_request_body(&self, pr: &PrReference) -> Result<String>;

    /// Reply within a review comment thread; returns the new comment id.
    fn reply_to_review_comment(&self, pr: &PrReference, in_reply_to: u64, body: &str)
        -> Result<u64>;

    /// Post a general conversation comment; returns the new comment id.
    fn create_issue_comment(&self, pr: &PrReference, body: &str) -> Result<u64>;

    /// Submit a review in one request; returns the review id.
    fn create_review(&self, pr: &PrReference, payload: &ReviewPayload) -> Result<u64>;

    fn update_pull_request_body(&self, pr: &PrReference, body: &str) -> Result<()>;
}

#[derive(Deserialize)]
struct Created {
    id: u64,
}

#[derive(Deserialize)]
struct PullRequest {
    #[serde(default)]
    body: Option<String>,
}

/// GitHub API access through the GitHub CLI (`gh api`).
pub struct GhCli {
    binary: String,
    hostname: String,
}

impl GhCli {
    pub fn new(binary: impl Into<String>, hostname: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            hostname: hostname.into(),
        }
    }

    fn api(
        &self,
        method: &str,
        endpoint: &str,
        input: Option<&Value>,
        paginate: bool,
    ) -> Result<Vec<u8>> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(["api", endpoint, "--method", method, "--hostname", &self.hostname]);
        if paginate {
            cmd.arg("--paginate");
        }
        if input.is_some() {
            cmd.args(["--input", "-"]);
        }
        cmd.stdin(if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

        debug!(method, endpoint, paginate, "gh api");

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AgentPrError::api(
                    None,
                    format!(
                        "GitHub CLI ({}) not installed. Install from https://cli.github.com",
                        self.binary
                    ),
                )
            } else {
                AgentPrError::api(None, format!("Failed to run {}: {}", self.binary, e))
            }
        })?;

        if let Some(input) = input {
            let bytes = serde_json::to_vec(input)
                .map_err(|e| AgentPrError::api(None, format!("Failed to encode request: {}", e)))?;
            let mut stdin = child
                .stdin
                .take()
                .ok_or_else(|| AgentPrError::api(None, "Failed to open gh stdin"))?;
            stdin
                .write_all(&bytes)
                .map_err(|e| AgentPrError::api(None, format!("Failed to send request: {}", e)))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| AgentPrError::api(None, format!("Failed to run {}: {}", self.binary, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            return Err(api_failure(&stderr, &stdout));
        }

        Ok(output.stdout)
    }

    fn pulls_endpoint(pr: &PrReference) -> String {
        format!("repos/{}/pulls/{}", pr.slug(), pr.number)
    }
}

/// Build an API error from a failed `gh api` run.
///
/// `gh` reports the status as `(HTTP 404)` on stderr and prints the
/// response body on stdout.
pub fn api_failure(stderr: &str, stdout: &str) -> AgentPrError {
    let stderr = stderr.trim();
    let stdout = stdout.trim();

    let status = Regex::new(r"HTTP (\d{3})")
        .ok()
        .and_then(|re| re.captures(stderr).or_else(|| re.captures(stdout)))
        .and_then(|caps| caps[1].parse::<u16>().ok());

    let message = if !stderr.is_empty() {
        stderr.to_string()
    } else if !stdout.is_empty() {
        stdout.to_string()
    } else {
        "Unknown error".to_string()
    };

    AgentPrError::api(status, message)
}

/// Decode `gh api --paginate` output: one JSON array per page, concatenated.
pub fn parse_comment_pages(output: &[u8]) -> Result<Vec<Comment>> {
    let mut comments = Vec::new();
    for page in serde_json::Deserializer::from_slice(output).into_iter::<Vec<Comment>>() {
        let page = page.map_err(|e| {
            AgentPrError::api(None, format!("Failed to parse review comments: {}", e))
        })?;
        comments.extend(page);
    }
    Ok(comments)
}

fn parse_created(output: &[u8]) -> Result<u64> {
    serde_json::from_slice::<Created>(output)
        .map(|created| created.id)
        .map_err(|e| AgentPrError::api(None, format!("Failed to parse API response: {}", e)))
}

impl GitHubApi for GhCli {
    fn list_review_comments(&self, pr: &PrReference) -> Result<Vec<Comment>> {
        let endpoint = format!("{}/comments?per_page=100", Self::pulls_endpoint(pr));
        let output = self.api("GET", &endpoint, None, true)?;
        parse_comment_pages(&output)
    }

    fn pull_request_body(&self, pr: &PrReference) -> Result<String> {
        let output = self.api("GET", &Self::pulls_endpoint(pr), None, false)?;
        let parsed: PullRequest = serde_json::from_slice(&output)
            .map_err(|e| AgentPrError::api(None, format!("Failed to parse PR: {}", e)))?;
        Ok(parsed.body.unwrap_or_default())
    }

    fn reply_to_review_comment(
        &self,
        pr: &PrReference,
        in_reply_to: u64,
        body: &str,
    ) -> Result<u64> {
        let endpoint = format!("{}/comments", Self::pulls_endpoint(pr));
        let input = json!({ "body": body, "in_reply_to": in_reply_to });
        let output = self.api("POST", &endpoint, Some(&input), false)?;
        parse_created(&output)
    }

    fn create_issue_comment(&self, pr: &PrReference, body: &str) -> Result<u64> {
        let endpoint = format!("repos/{}/issues/{}/comments", pr.slug(), pr.number);
        let input = json!({ "body": body });
        let output = self.api("POST", &endpoint, Some(&input), false)?;
        parse_created(&output)
    }

    fn create_review(&self, pr: &PrReference, payload: &ReviewPayload) -> Result<u64> {
        let endpoint = format!("{}/reviews", Self::pulls_endpoint(pr));
        let input = serde_json::to_value(payload)
            .map_err(|e| AgentPrError::api(None, format!("Failed to encode review: {}", e)))?;
        let output = self.api("POST", &endpoint, Some(&input), false)?;
        parse_created(&output)
    }

    fn update_pull_request_body(&self, pr: &PrReference, body: &str) -> Result<()> {
        let input = json!({ "body": body });
        self.api("PATCH", &Self::pulls_endpoint(pr), Some(&input), false)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::pr;

    #[test]
    fn test_api_failure_extracts_status() {
        let err = api_failure("gh: Not Found (HTTP 404)\n", "{\"message\":\"Not Found\"}");
        assert_eq!(err.status(), Some(404));
        assert!(err.to_string().contains("Not Found"));

        let err = api_failure("gh: Validation Failed (HTTP 422)", "");
        assert_eq!(err.status(), Some(422));
    }

    #[test]
    fn test_api_failure_without_status() {
        let err = api_failure("", "");
        assert_eq!(err.status(), None);
        assert!(err.to_string().contains("Unknown error"));

        let err = api_failure("", "HTTP 401: Bad credentials");
        assert_eq!(err.status(), Some(401));
        assert!(err.to_string().contains("Bad credentials"));
    }

    #[test]
    fn test_parse_comment_pages_concatenated() {
        let output = br#"[{"id":1,"body":"root"},{"id":2,"body":"r","in_reply_to_id":1}][{"id":3,"body":"other"}]"#;
        let comments = parse_comment_pages(output).unwrap();
        let ids: Vec<u64> = comments.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(comments[1].in_reply_to, Some(1));
    }

    #[test]
    fn test_parse_comment_pages_newline_separated_and_empty() {
        let output = b"[{\"id\":1,\"body\":\"a\"}]\n[]\n";
        assert_eq!(parse_comment_pages(output).unwrap().len(), 1);
        assert!(parse_comment_pages(b"").unwrap().is_empty());
    }

    #[test]
    fn test_parse_comment_pages_garbage_is_api_error() {
        let err = parse_comment_pages(b"<html>").unwrap_err();
        assert!(matches!(err, AgentPrError::Api { status: None, .. }));
    }

    #[test]
    fn test_parse_created_reads_id() {
        assert_eq!(parse_created(br#"{"id": 99, "body": "x"}"#).unwrap(), 99);
        assert!(parse_created(b"{}").is_err());
    }

    #[test]
    fn test_missing_gh_binary_is_api_error() {
        let gh = GhCli::new("definitely-not-gh-12345", "github.com");
        let err = gh.pull_request_body(&pr(1)).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("not installed"));
    }
}
