//! # Reporters for the testvisor engine.
//!
//! This module provides the [`Reporter`] trait and built-in implementations
//! receiving results from the scheduler.
//!
//! ## Architecture
//! ```text
//! Call flow:
//!   Scheduler ── on_result / on_group_* / on_progress / on_complete ──► ReporterSet
//!                                                                          │
//!                                                            ┌─────────────┼─────────────┐
//!                                                            ▼             ▼             ▼
//!                                                        Recorder     LogReporter     Custom
//! ```
//!
//! ## Reporter types
//! - **Presentation reporters** - render results (console, files, UIs)
//! - **Stateful reporters** - keep results for later inspection ([`Recorder`])
//!
//! Reporters can also be resolved by name with [`by_name`], e.g. from a CLI flag.

mod embedded;
mod reporter;
mod set;

use std::sync::Arc;

#[cfg(feature = "logging")]
pub use embedded::LogReporter;
pub use embedded::{NullReporter, Record, Recorder};
pub use reporter::Reporter;
pub use set::ReporterSet;

use crate::error::SetupError;

/// Resolves a built-in reporter by name.
///
/// Known names: `"null"`, `"recorder"`, and `"log"` (with the `logging` feature).
///
/// # Example
/// ```
/// use testvisor::reporters;
///
/// assert!(reporters::by_name("null").is_ok());
/// assert!(reporters::by_name("carrier-pigeon").is_err());
/// ```
pub fn by_name(name: &str) -> Result<Arc<dyn Reporter>, SetupError> {
    match name {
        "null" => Ok(Arc::new(NullReporter)),
        "recorder" => Ok(Arc::new(Recorder::new())),
        #[cfg(feature = "logging")]
        "log" => Ok(Arc::new(LogReporter::new())),
        other => Err(SetupError::UnknownReporter {
            name: other.to_string(),
        }),
    }
}
