//! # verdict-engine
//!
//! Keeps every submission's final decision equal to the decision policy
//! applied to its latest committed evidence.
//!
//! Each submission with pending work gets one worker task. Triggers for the
//! same submission are handled strictly in arrival order, triggers queued
//! during a recomputation are answered by the next one, and different
//! submissions proceed in parallel. Workers retire after an idle period.
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use verdict_core::enums::{Source, Verdict};
//! use verdict_core::input::EvidenceUpsert;
//! use verdict_db::service::VerdictService;
//! use verdict_engine::{Aggregator, AggregatorConfig};
//!
//! let service = Arc::new(VerdictService::new_local(".verdict/verdict.db").await?);
//! let aggregator = Aggregator::new(service, AggregatorConfig::default());
//! let decision = aggregator
//!     .submit_evidence(&EvidenceUpsert::opinion("sub-1a2b3c4d", Source::FactCheckApi, Verdict::False, None))
//!     .await?;
//! println!("{} via {}", decision.verdict, decision.source);
//! # Ok(())
//! # }
//! ```

mod aggregator;
mod config;
mod error;

pub use aggregator::Aggregator;
pub use config::AggregatorConfig;
pub use error::AggregationError;
