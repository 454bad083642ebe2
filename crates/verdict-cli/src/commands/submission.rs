use serde::Serialize;
use verdict_core::entities::Submission;
use verdict_core::enums::InputModality;
use verdict_core::input::NewSubmission;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::SubmissionCommands;
use crate::commands::shared::parse::parse_enum;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct SubmissionListResponse {
    submissions: Vec<Submission>,
}

#[derive(Debug, Serialize)]
struct DeletedResponse<'a> {
    deleted: &'a str,
}

/// Handle `vrd submission`.
pub async fn handle(
    action: &SubmissionCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        SubmissionCommands::Create {
            content,
            fingerprint,
            modality,
            language,
            submitter,
        } => {
            let new = NewSubmission {
                modality: parse_enum::<InputModality>(modality, "modality")?,
                content: content.clone(),
                fingerprint: fingerprint.clone(),
                language: language.clone(),
                submitter_id: submitter.clone(),
            };
            let submission = ctx.service.create_submission(&new).await?;
            output(&submission, flags.format)
        }
        SubmissionCommands::Get { id } => {
            let submission = ctx.service.get_submission(id).await?;
            output(&submission, flags.format)
        }
        SubmissionCommands::List { submitter } => {
            let limit = ctx.limit();
            let submissions = match submitter {
                Some(submitter) => {
                    ctx.service
                        .list_submissions_by_submitter(submitter, limit)
                        .await?
                }
                None => ctx.service.list_submissions(limit).await?,
            };
            output(&SubmissionListResponse { submissions }, flags.format)
        }
        SubmissionCommands::Delete { id } => {
            ctx.service.delete_submission(id).await?;
            output(&DeletedResponse { deleted: id }, flags.format)
        }
    }
}
