//! Entity structs for all Verdict domain objects.
//!
//! Each entity maps to a table in the libSQL database (see
//! `verdict-db/migrations/001_initial.sql`). All structs derive `Serialize`,
//! `Deserialize`, and `JsonSchema` for JSON roundtrip and schema validation.

mod decision;
mod evidence;
mod feedback;
mod submission;

pub use decision::FinalDecision;
pub use evidence::{Citation, Evidence};
pub use feedback::Feedback;
pub use submission::Submission;
