//! Named section merging for PR descriptions.
//!
//! A section is a header line, optionally preceded by a `---` line, running
//! until the next line that is exactly `---` or the end of the text:
//!
//! ```text
//! Existing description
//!
//! ---
//! ## Comments Addressed
//! - Fixed null check
//! ```

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{AgentPrError, Result};

use super::transport::GitHubApi;
use super::types::PrReference;

const DELIMITER: &str = "---";

/// What a merge did to the description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeAction {
    Created,
    Appended,
    Replaced,
}

/// Byte offsets of a section inside a description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpan {
    /// End of the preceding content; the delimiter and blank lines before
    /// the header belong to the section.
    pub start: usize,
    /// Start of the header line.
    pub header: usize,
    /// The newline before the next delimiter line, or the text length.
    pub end: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionState {
    Absent,
    Present(SectionSpan),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeResult {
    pub text: String,
    pub action: MergeAction,
}

/// Find the first line equal to `header` (trailing whitespace ignored).
pub fn locate_section(text: &str, header: &str) -> SectionState {
    let header = header.trim();
    let mut offset = 0;
    let mut found = None;

    for line in text.split_inclusive('\n') {
        if line.trim_end() == header {
            found = Some((offset, offset + line.len()));
            break;
        }
        offset += line.len();
    }

    let Some((header_start, header_end)) = found else {
        return SectionState::Absent;
    };

    let mut end = text.len();
    let mut offset = header_end;
    for line in text[header_end..].split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            end = offset - 1;
            break;
        }
        offset += line.len();
    }

    let before = text[..header_start].trim_end();
    let before = match before.strip_suffix(DELIMITER) {
        Some(rest) if rest.is_empty() || rest.ends_with('\n') => rest.trim_end(),
        _ => before,
    };

    SectionState::Present(SectionSpan {
        start: before.len(),
        header: header_start,
        end,
    })
}

/// Reject section bodies that contain a delimiter line.
///
/// The section would end at that line, so later merges could no longer
/// find the whole body.
pub fn check_section_body(body: &str) -> Result<()> {
    if unescape_newlines(body)
        .lines()
        .any(|line| line.trim_end() == DELIMITER)
    {
        return Err(AgentPrError::Input(format!(
            "Section body must not contain a line consisting only of '{}'",
            DELIMITER
        )));
    }
    Ok(())
}

/// Turn literal `\n` escape sequences into real newlines.
pub fn unescape_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}

fn render_section(preceding: &str, header: &str, body: &str) -> String {
    if preceding.is_empty() {
        format!("{}\n{}\n{}", DELIMITER, header, body)
    } else {
        format!("\n\n{}\n{}\n{}", DELIMITER, header, body)
    }
}

/// Insert, extend or replace the `header` section of `current`.
///
/// Appending is additive: running it twice adds the body twice. Replacing
/// is idempotent: the second run with the same body changes nothing.
pub fn merge_section(current: &str, header: &str, body: &str, replace: bool) -> MergeResult {
    let header = header.trim();
    let body = unescape_newlines(body);
    let body = body.trim_end();

    match locate_section(current, header) {
        SectionState::Absent => {
            let base = current.trim_end();
            MergeResult {
                text: format!("{}{}", base, render_section(base, header, body)),
                action: MergeAction::Created,
            }
        }
        SectionState::Present(span) if replace => {
            let preceding = &current[..span.start];
            MergeResult {
                text: format!(
                    "{}{}{}",
                    preceding,
                    render_section(preceding, header, body),
                    &current[span.end..]
                ),
                action: MergeAction::Replaced,
            }
        }
        SectionState::Present(span) => MergeResult {
            text: format!(
                "{}\n{}{}",
                current[..span.end].trim_end(),
                body,
                &current[span.end..]
            ),
            action: MergeAction::Appended,
        },
    }
}

/// Result of updating a PR description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescriptionOutcome {
    pub action: MergeAction,
    pub pr_number: u64,
    /// False when the merged text equals the current text and no write was made.
    pub changed: bool,
}

/// Fetch the description, merge the section and write it back if it changed.
pub fn update_description(
    api: &dyn GitHubApi,
    pr: &PrReference,
    header: &str,
    body: &str,
    replace: bool,
) -> Result<DescriptionOutcome> {
    check_section_body(body)?;
    let current = api.pull_request_body(pr)?;
    let merged = merge_section(&current, header, body, replace);
    let changed = merged.text != current;

    if changed {
        api.update_pull_request_body(pr, &merged.text)?;
        info!(%pr, action = ?merged.action, "PR description updated");
    } else {
        debug!(%pr, "PR description already up to date");
    }

    Ok(DescriptionOutcome {
        action: merged.action,
        pr_number: pr.number,
        changed,
    })
}
