use clap::Subcommand;

/// Evidence commands.
#[derive(Clone, Debug, Subcommand)]
pub enum EvidenceCommands {
    /// Store evidence and bring the affected decisions up to date.
    #[command(group(clap::ArgGroup::new("input").required(true).args(["file", "json"])))]
    Ingest {
        /// JSON Lines file, one evidence object per line.
        #[arg(long)]
        file: Option<String>,
        /// A single evidence object.
        #[arg(long)]
        json: Option<String>,
    },
    /// List evidence for a submission.
    List {
        submission_id: String,
        /// Skip rows not flagged for display.
        #[arg(long)]
        visible_only: bool,
    },
}
