use clap::Subcommand;

/// Feedback commands.
#[derive(Clone, Debug, Subcommand)]
pub enum FeedbackCommands {
    /// Record a correction label.
    Add {
        submission_id: String,
        /// Label: true, false, unknown
        #[arg(long)]
        label: String,
        #[arg(long)]
        comment: Option<String>,
        /// Provider: user, external
        #[arg(long, default_value = "user")]
        provider: String,
    },
    /// List feedback for a submission.
    List { submission_id: String },
}
