use clap::Subcommand;

/// Final decision commands.
#[derive(Clone, Debug, Subcommand)]
pub enum DecisionCommands {
    /// Show the stored decision.
    Get { submission_id: String },
    /// Re-derive the decision from the current evidence.
    Recompute { submission_id: String },
}
