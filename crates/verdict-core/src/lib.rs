//! # verdict-core
//!
//! Core types, the decision policy, and error types for Verdict.
//!
//! This crate provides the foundational types shared across all Verdict crates:
//! - Entity structs for submissions, evidence, final decisions and feedback
//! - Closed enums for sources, verdicts and modalities
//! - Boundary validation for inbound evidence
//! - The pure decision policy that picks one verdict from competing sources
//! - ID prefix constants
//! - Read-side summary types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod input;
pub mod policy;
pub mod responses;
