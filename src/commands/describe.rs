//! Describe command handler.

use super::Context;
use crate::error::Result;
use crate::gh::{update_description, DescriptionOutcome, MergeAction};
use crate::output::{print_info, print_progress, print_success};
use crate::request::DescriptionRequest;

/// Merge the summary into the PR description section and write it back.
pub fn describe_command(
    ctx: &Context<'_>,
    request: DescriptionRequest,
) -> Result<DescriptionOutcome> {
    let pr = ctx.resolve(&request.pr)?;
    let header = request
        .header
        .as_deref()
        .unwrap_or(&ctx.config.section_header);

    print_progress(&format!("Updating description of {}", pr));
    let outcome = update_description(ctx.api, &pr, header, &request.summary, request.replace)?;

    if !outcome.changed {
        print_info("Description already up to date");
    } else {
        let verb = match outcome.action {
            MergeAction::Created => "Created",
            MergeAction::Appended => "Appended to",
            MergeAction::Replaced => "Replaced",
        };
        print_success(&format!("{} section \"{}\" on {}", verb, header, pr));
    }

    Ok(outcome)
}
