//! PR reference resolution.
//!
//! Turns a user supplied reference (bare number or full pull request URL)
//! into a concrete [`PrReference`]. Bare numbers take owner and repository
//! from the ambient repository's remote URL.

use regex::Regex;
use tracing::debug;

use crate::error::{AgentPrError, Result};
use crate::git::RepoContext;

use super::types::PrReference;

/// Resolves PR references against a GitHub host and a local repository.
pub struct ReferenceResolver<'a> {
    host: &'a str,
    repo: &'a dyn RepoContext,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(host: &'a str, repo: &'a dyn RepoContext) -> Self {
        Self { host, repo }
    }

    /// Resolve `reference` into an owner/repo/number triple.
    ///
    /// A pull request URL is parsed directly without consulting the
    /// repository. Anything else must be a positive integer.
    pub fn resolve(&self, reference: &str) -> Result<PrReference> {
        let reference = reference.trim();

        if let Some(pr) = parse_pr_url(self.host, reference) {
            debug!(%pr, "resolved PR from URL");
            return Ok(pr);
        }

        let number = parse_pr_number(reference)?;
        let remote_url = self.repo.remote_url()?;
        let (owner, repo) = parse_remote_url(self.host, &remote_url).ok_or_else(|| {
            AgentPrError::Reference(format!(
                "Could not parse GitHub owner/repo from remote: {}",
                remote_url
            ))
        })?;

        let pr = PrReference {
            owner,
            repo,
            number,
        };
        debug!(%pr, remote = %remote_url, "resolved PR from remote");
        Ok(pr)
    }
}

fn parse_pr_number(reference: &str) -> Result<u64> {
    if reference.is_empty() || !reference.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AgentPrError::Reference(format!(
            "Invalid PR reference: {}",
            reference
        )));
    }

    match reference.parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(AgentPrError::Reference(format!(
            "Invalid PR reference: {}",
            reference
        ))),
    }
}

/// Parse `https://HOST/OWNER/REPO/pull/N` (trailing path segments allowed).
pub fn parse_pr_url(host: &str, url: &str) -> Option<PrReference> {
    let pattern = format!(
        r"^https?://{}/([^/\s]+)/([^/\s]+)/pull/(\d+)(?:[/?#].*)?$",
        regex::escape(host)
    );
    let re = Regex::new(&pattern).ok()?;
    let caps = re.captures(url)?;

    let number: u64 = caps[3].parse().ok()?;
    if number == 0 {
        return None;
    }

    Some(PrReference {
        owner: caps[1].to_string(),
        repo: caps[2].to_string(),
        number,
    })
}

/// Parse an SSH (`git@HOST:OWNER/REPO.git`) or HTTPS
/// (`https://HOST/OWNER/REPO`) remote URL into owner and repository.
pub fn parse_remote_url(host: &str, url: &str) -> Option<(String, String)> {
    let pattern = format!(
        r"(?:^|[@/]){}(?::\d+)?[:/]([^/\s]+)/([^/\s]+?)(?:\.git)?/?$",
        regex::escape(host)
    );
    let re = Regex::new(&pattern).ok()?;
    let caps = re.captures(url.trim())?;

    let owner = caps[1].to_string();
    let repo = caps[2].to_string();
    if owner.is_empty() || repo.is_empty() {
        return None;
    }

    Some((owner, repo))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeRepo;

    const HOST: &str = "github.com";

    #[test]
    fn test_url_resolves_without_repo_context() {
        let repo = FakeRepo::without_remote();
        let resolver = ReferenceResolver::new(HOST, &repo);

        let pr = resolver
            .resolve("https://github.com/octo/widgets/pull/123")
            .unwrap();
        assert_eq!(pr.owner, "octo");
        assert_eq!(pr.repo, "widgets");
        assert_eq!(pr.number, 123);
        assert_eq!(repo.lookups(), 0);
    }

    #[test]
    fn test_url_with_trailing_segments() {
        let pr = parse_pr_url(HOST, "https://github.com/octo/widgets/pull/9/files").unwrap();
        assert_eq!(pr.number, 9);
        let pr = parse_pr_url(HOST, "http://github.com/a/b/pull/1#discussion_r1").unwrap();
        assert_eq!((pr.owner.as_str(), pr.repo.as_str()), ("a", "b"));
    }

    #[test]
    fn test_url_for_other_host_is_not_a_pr_url() {
        assert!(parse_pr_url(HOST, "https://gitlab.com/a/b/pull/1").is_none());
        assert!(parse_pr_url(HOST, "https://github.com/a/b/issues/1").is_none());
        assert!(parse_pr_url(HOST, "https://github.com/a/b/pull/0").is_none());
    }

    #[test]
    fn test_enterprise_host() {
        let pr = parse_pr_url("git.corp.example", "https://git.corp.example/team/svc/pull/5")
            .unwrap();
        assert_eq!(pr.slug(), "team/svc");
    }

    #[test]
    fn test_bare_number_with_ssh_remote() {
        let repo = FakeRepo::with_remote("git@github.com:octo/widgets.git");
        let resolver = ReferenceResolver::new(HOST, &repo);

        let pr = resolver.resolve("42").unwrap();
        assert_eq!(
            pr,
            PrReference {
                owner: "octo".to_string(),
                repo: "widgets".to_string(),
                number: 42,
            }
        );
        assert_eq!(repo.lookups(), 1);
    }

    #[test]
    fn test_bare_number_with_https_remote() {
        let repo = FakeRepo::with_remote("https://github.com/octo/widgets");
        let resolver = ReferenceResolver::new(HOST, &repo);
        let pr = resolver.resolve(" 7 ").unwrap();
        assert_eq!(pr.slug(), "octo/widgets");
        assert_eq!(pr.number, 7);
    }

    #[test]
    fn test_remote_url_forms() {
        let expected = Some(("octo".to_string(), "widgets".to_string()));
        assert_eq!(parse_remote_url(HOST, "git@github.com:octo/widgets.git"), expected);
        assert_eq!(parse_remote_url(HOST, "git@github.com:octo/widgets"), expected);
        assert_eq!(parse_remote_url(HOST, "https://github.com/octo/widgets.git"), expected);
        assert_eq!(parse_remote_url(HOST, "https://github.com/octo/widgets/"), expected);
        assert_eq!(
            parse_remote_url(HOST, "ssh://git@github.com/octo/widgets.git"),
            expected
        );
        assert_eq!(
            parse_remote_url(HOST, "https://token@github.com/octo/widgets.git\n"),
            expected
        );
        assert_eq!(
            parse_remote_url(HOST, "git@github.com:octo/my.dotted.repo.git"),
            Some(("octo".to_string(), "my.dotted.repo".to_string()))
        );
    }

    #[test]
    fn test_unrecognized_remote() {
        assert!(parse_remote_url(HOST, "git@gitlab.com:octo/widgets.git").is_none());
        assert!(parse_remote_url(HOST, "/srv/git/widgets.git").is_none());
        assert!(parse_remote_url(HOST, "https://notgithub.com/octo/widgets").is_none());

        let repo = FakeRepo::with_remote("/srv/git/widgets.git");
        let resolver = ReferenceResolver::new(HOST, &repo);
        match resolver.resolve("3") {
            Err(AgentPrError::Reference(msg)) => assert!(msg.contains("/srv/git/widgets.git")),
            other => panic!("Expected reference error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_reference_is_rejected() {
        let repo = FakeRepo::with_remote("git@github.com:octo/widgets.git");
        let resolver = ReferenceResolver::new(HOST, &repo);

        for bad in ["abc", "", "12a", "-4", "0", "#12"] {
            match resolver.resolve(bad) {
                Err(AgentPrError::Reference(msg)) => {
                    assert!(msg.contains("Invalid PR reference"), "{}", msg)
                }
                other => panic!("Expected reference error for {:?}, got {:?}", bad, other),
            }
        }
        assert_eq!(repo.lookups(), 0);
    }

    #[test]
    fn test_missing_remote_is_reference_error() {
        let repo = FakeRepo::without_remote();
        let resolver = ReferenceResolver::new(HOST, &repo);
        assert!(matches!(
            resolver.resolve("12"),
            Err(AgentPrError::Reference(_))
        ));
    }
}
