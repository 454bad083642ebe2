use std::io::ErrorKind;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use verdict_core::entities::Evidence;
use verdict_core::input::EvidenceInput;
use verdict_core::responses::{IngestRejection, IngestReport};
use verdict_engine::Aggregator;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::EvidenceCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Serialize)]
struct EvidenceListResponse {
    evidence: Vec<Evidence>,
}

/// Handle `vrd evidence`.
pub async fn handle(
    action: &EvidenceCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        EvidenceCommands::Ingest { file, json } => {
            let inputs = match (file, json) {
                (Some(path), _) => read_jsonl(Path::new(path))?,
                (None, Some(json)) => vec![parse_one(json)],
                (None, None) => anyhow::bail!("either --file or --json is required"),
            };
            let report = ingest(&ctx.aggregator, inputs).await;
            output(&report, flags.format)
        }
        EvidenceCommands::List {
            submission_id,
            visible_only,
        } => {
            let evidence = if *visible_only {
                ctx.service.list_visible_evidence(submission_id).await?
            } else {
                ctx.service.list_evidence(submission_id).await?
            };
            output(&EvidenceListResponse { evidence }, flags.format)
        }
    }
}

/// One parsed line: its 1-based number and the decoded input or the reason it failed.
type Line = (u32, Result<EvidenceInput, String>);

fn parse_one(json: &str) -> Line {
    (1, serde_json::from_str(json).map_err(|e| e.to_string()))
}

/// Decode a JSON Lines file. Undecodable lines are kept as rejections;
/// I/O failures abort.
fn read_jsonl(path: &Path) -> anyhow::Result<Vec<Line>> {
    let lines = serde_jsonlines::json_lines::<EvidenceInput, _>(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let mut parsed = Vec::new();
    for (line_no, line) in (1u32..).zip(lines) {
        match line {
            Ok(input) => parsed.push((line_no, Ok(input))),
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                parsed.push((line_no, Err(e.to_string())));
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()));
            }
        }
    }
    Ok(parsed)
}

/// Feed decoded lines through the aggregator in order.
///
/// Each accepted line yields the decision that reflects it; the report keeps
/// only the latest decision per submission.
async fn ingest(aggregator: &Aggregator, inputs: Vec<Line>) -> IngestReport {
    let mut report = IngestReport::default();
    for (line, input) in inputs {
        let outcome = match input {
            Ok(input) => aggregator.ingest(input).await.map_err(|e| e.to_string()),
            Err(reason) => Err(reason),
        };
        match outcome {
            Ok(decision) => {
                report.accepted += 1;
                if let Some(existing) = report
                    .decisions
                    .iter_mut()
                    .find(|d| d.submission_id == decision.submission_id)
                {
                    *existing = decision;
                } else {
                    report.decisions.push(decision);
                }
            }
            Err(reason) => {
                tracing::warn!(line, %reason, "evidence rejected");
                report.rejected.push(IngestRejection { line, reason });
            }
        }
    }
    report
}
