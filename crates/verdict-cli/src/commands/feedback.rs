use serde::Serialize;
use verdict_core::entities::Feedback;
use verdict_core::enums::{FeedbackProvider, Verdict};
use verdict_core::input::NewFeedback;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::FeedbackCommands;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct FeedbackListResponse {
    feedback: Vec<Feedback>,
}

/// Handle `vrd feedback`.
pub async fn handle(
    action: &FeedbackCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        FeedbackCommands::Add {
            submission_id,
            label,
            comment,
            provider,
        } => {
            let new = NewFeedback {
                submission_id: submission_id.clone(),
                label: parse_enum::<Verdict>(label, "label")?,
                comment: comment.clone(),
                provider: parse_enum::<FeedbackProvider>(provider, "provider")?,
            };
            let feedback = ctx.service.record_feedback(&new).await?;
            output(&feedback, flags.format)
        }
        FeedbackCommands::List { submission_id } => {
            let feedback = ctx.service.list_feedback(submission_id).await?;
            output(&FeedbackListResponse { feedback }, flags.format)
        }
    }
}
