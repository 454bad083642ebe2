use serde::Serialize;
use verdict_core::responses::DecisionSummaryRow;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::SummaryCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct SummaryListResponse {
    decisions: Vec<DecisionSummaryRow>,
}

/// Handle `vrd summary`.
pub async fn handle(
    action: &SummaryCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        SummaryCommands::Get { submission_id } => {
            let summary = ctx.service.submission_summary(submission_id).await?;
            output(&summary, flags.format)
        }
        SummaryCommands::List => {
            let decisions = ctx.service.list_decision_summaries(ctx.limit()).await?;
            output(&SummaryListResponse { decisions }, flags.format)
        }
    }
}
