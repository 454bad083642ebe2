use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Submission { action } => commands::submission::handle(&action, ctx, flags).await,
        Commands::Evidence { action } => commands::evidence::handle(&action, ctx, flags).await,
        Commands::Decision { action } => commands::decision::handle(&action, ctx, flags).await,
        Commands::Summary { action } => commands::summary::handle(&action, ctx, flags).await,
        Commands::Feedback { action } => commands::feedback::handle(&action, ctx, flags).await,
        Commands::Schema(args) => commands::schema::handle(&args, flags),
    }
}
