use clap::{Args, Subcommand, ValueEnum};

use crate::cli::subcommands::{
    DecisionCommands, EvidenceCommands, FeedbackCommands, SubmissionCommands, SummaryCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Submissions (claims awaiting verification).
    Submission {
        #[command(subcommand)]
        action: SubmissionCommands,
    },
    /// Evidence from verification sources.
    Evidence {
        #[command(subcommand)]
        action: EvidenceCommands,
    },
    /// Final decisions.
    Decision {
        #[command(subcommand)]
        action: DecisionCommands,
    },
    /// Read-only summaries.
    Summary {
        #[command(subcommand)]
        action: SummaryCommands,
    },
    /// Correction feedback.
    Feedback {
        #[command(subcommand)]
        action: FeedbackCommands,
    },
    /// Dump JSON schema for a wire type.
    Schema(SchemaArgs),
}

/// Wire types with a published JSON schema.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SchemaKind {
    EvidenceInput,
    FinalDecision,
}

/// Arguments for `vrd schema`.
#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    pub kind: SchemaKind,
}
