use clap::Subcommand;

/// Summary commands.
#[derive(Clone, Debug, Subcommand)]
pub enum SummaryCommands {
    /// Submission with decision, visible evidence and feedback count.
    Get { submission_id: String },
    /// Decided submissions, most recent decision first.
    List,
}
