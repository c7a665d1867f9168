//! Processing pipeline
//!
//! The applier rewrites columns with value-mapping consistency; the
//! orchestrator turns a user decision plus a detection report into the
//! final `(data, schema, lookup table)` triple.

pub mod applier;
pub mod orchestrator;
pub mod result;

pub use applier::{AnonymizationApplier, Applied, ApplyOptions, PreviewCell, PreviewRow};
pub use orchestrator::{AnonymizationRequest, Decision, DecisionOrchestrator, DecisionRequest};
pub use result::{LookupEntry, LookupTable, ProcessingDetails, ProcessingResult};
