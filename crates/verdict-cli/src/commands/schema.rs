use verdict_core::entities::FinalDecision;
use verdict_core::input::EvidenceInput;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{SchemaArgs, SchemaKind};
use crate::output::output;

/// Handle `vrd schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&schema_for(args.kind), flags.format)
}

fn schema_for(kind: SchemaKind) -> schemars::Schema {
    match kind {
        SchemaKind::EvidenceInput => schemars::schema_for!(EvidenceInput),
        SchemaKind::FinalDecision => schemars::schema_for!(FinalDecision),
    }
}
