//! Error types used by the testvisor engine.
//!
//! This module defines two main error enums:
//!
//! - [`SetupError`]: configuration faults returned straight to the caller
//!   (invalid interception target, unknown reporter). They never enter the task stream.
//! - [`Fault`]: runtime faults absorbed into a test result as an `error` verdict.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging.

use std::any::Any;
use std::time::Duration;

use thiserror::Error;

use crate::value::Value;

/// # Errors raised while setting up a suite.
///
/// These abort the declaration or setup call itself.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    /// The interception target has no callable slot under `method`.
    #[error("cannot intercept '{method}': {reason}")]
    InvalidTarget {
        /// Method name that was requested.
        method: String,
        /// Why the target was rejected.
        reason: String,
    },

    /// No reporter is registered under this name.
    #[error("unknown reporter '{name}'")]
    UnknownReporter {
        /// The requested reporter name.
        name: String,
    },
}

impl SetupError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use testvisor::SetupError;
    ///
    /// let err = SetupError::UnknownReporter { name: "tap".into() };
    /// assert_eq!(err.as_label(), "setup_unknown_reporter");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SetupError::InvalidTarget { .. } => "setup_invalid_target",
            SetupError::UnknownReporter { .. } => "setup_unknown_reporter",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SetupError::InvalidTarget { method, reason } => {
                format!("invalid target for '{method}': {reason}")
            }
            SetupError::UnknownReporter { name } => format!("unknown reporter: {name}"),
        }
    }
}

/// # Faults absorbed into test results.
///
/// A fault never escapes the engine; the executor turns it into an `error`
/// verdict whose `actual` is [`Fault::to_value`].
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// The operation did not settle within its timeout.
    #[error("timed out after {timeout:?}")]
    Timeout {
        /// The timeout that was exceeded.
        timeout: Duration,
    },

    /// The operation panicked while being invoked or polled.
    #[error("panicked: {message}")]
    Panicked {
        /// Panic payload rendered as text.
        message: String,
    },

    /// The spawned execution was lost (aborted or the runtime shut down).
    #[error("execution lost: {reason}")]
    Lost {
        /// Join error description.
        reason: String,
    },
}

impl Fault {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use testvisor::Fault;
    /// use std::time::Duration;
    ///
    /// let f = Fault::Timeout { timeout: Duration::from_millis(50) };
    /// assert_eq!(f.as_label(), "fault_timeout");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            Fault::Timeout { .. } => "fault_timeout",
            Fault::Panicked { .. } => "fault_panicked",
            Fault::Lost { .. } => "fault_lost",
        }
    }

    /// Returns a human-readable message with details about the fault.
    pub fn as_message(&self) -> String {
        match self {
            Fault::Timeout { timeout } => format!("timeout: {timeout:?}"),
            Fault::Panicked { message } => format!("panic: {message}"),
            Fault::Lost { reason } => format!("lost: {reason}"),
        }
    }

    /// Builds a fault from a caught panic payload.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(msg) = payload.downcast_ref::<&'static str>() {
            (*msg).to_string()
        } else if let Some(msg) = payload.downcast_ref::<String>() {
            msg.clone()
        } else {
            "unknown panic".to_string()
        };
        Fault::Panicked { message }
    }

    /// The thrown value recorded as a result's `actual`.
    ///
    /// # Example
    /// ```
    /// use testvisor::Fault;
    /// use std::time::Duration;
    ///
    /// let v = Fault::Timeout { timeout: Duration::from_millis(50) }.to_value();
    /// assert_eq!(v.to_string(), "TimeoutError: timed out after 50ms");
    /// ```
    pub fn to_value(&self) -> Value {
        let name = match self {
            Fault::Timeout { .. } => "TimeoutError",
            Fault::Panicked { .. } => "Panic",
            Fault::Lost { .. } => "LostError",
        };
        Value::error(name, self.to_string())
    }
}
