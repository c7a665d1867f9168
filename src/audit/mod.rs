//! Audit logging for processing runs
//!
//! Structured append-only records of what happened to each dataset,
//! without ever writing raw cell values.

pub mod logger;

pub use logger::RunLogger;
