//! Repository modules implementing storage operations for all Verdict entities.
//!
//! Each module adds methods to `VerdictService` via `impl VerdictService` blocks.
//! Statements that must run inside a caller's transaction are exposed as free
//! functions over `&libsql::Connection`.

pub mod decision;
pub mod evidence;
pub mod feedback;
pub mod submission;
pub mod summary;
