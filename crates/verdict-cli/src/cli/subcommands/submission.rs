use clap::Subcommand;

/// Submission commands.
#[derive(Clone, Debug, Subcommand)]
pub enum SubmissionCommands {
    /// Store a new submission.
    Create {
        #[arg(long)]
        content: String,
        /// Precomputed content fingerprint (must be unique).
        #[arg(long)]
        fingerprint: String,
        /// Input modality: text, image, audio
        #[arg(long, default_value = "text")]
        modality: String,
        #[arg(long)]
        language: Option<String>,
        #[arg(long)]
        submitter: Option<String>,
    },
    /// Get a submission by ID.
    Get { id: String },
    /// List submissions, newest first.
    List {
        /// Only submissions from this submitter.
        #[arg(long)]
        submitter: Option<String>,
    },
    /// Delete a submission with its evidence, decision and feedback.
    Delete { id: String },
}
