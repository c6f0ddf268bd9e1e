//! Runtime core: declaration, scheduling and execution.
//!
//! This module contains the embedded implementation of the testvisor engine.
//! The public API from this module is [`Suite`] (with its [`SuiteBuilder`] and
//! [`GroupScope`]), [`Config`], and the [`wait`] helper.
//!
//! Internal modules:
//! - [`queue`]: declaration-ordered task list and the chain of group bodies;
//! - [`executor`]: runs one test with timeout racing and panic isolation;
//! - [`group`]: buffers in-flight group members and reports them in order;
//! - [`suite`]: drains the queue and drives the reporters.

mod builder;
mod config;
mod executor;
mod group;
mod queue;
mod suite;

pub use builder::SuiteBuilder;
pub use config::Config;
pub use suite::{wait, GroupScope, Suite};
