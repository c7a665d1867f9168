//! Domain models and types for Cloak.
//!
//! The domain layer provides:
//! - **Dataset model** ([`Schema`], [`ColumnSchema`], [`Row`])
//! - **Error types** ([`CloakError`])
//! - **Result type alias** ([`Result`])
//!
//! Everything here is a plain value produced fresh per invocation; the
//! engine holds no cross-request mutable state.

pub mod dataset;
pub mod errors;

pub use dataset::{value_to_string, ColumnSchema, ColumnType, Row, Schema};
pub use errors::{CloakError, Result};
