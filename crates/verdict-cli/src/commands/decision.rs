use anyhow::Context;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::DecisionCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `vrd decision`.
pub async fn handle(
    action: &DecisionCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        DecisionCommands::Get { submission_id } => {
            let decision = ctx
                .service
                .get_decision(submission_id)
                .await?
                .with_context(|| format!("no decision recorded for {submission_id}"))?;
            output(&decision, flags.format)
        }
        DecisionCommands::Recompute { submission_id } => {
            let decision = ctx.aggregator.recompute(submission_id).await?;
            output(&decision, flags.format)
        }
    }
}
