use std::sync::Arc;

use crate::{
    core::{config::Config, suite::Suite},
    error::SetupError,
    reporters::{self, Reporter},
};

/// Builder for constructing a [`Suite`] with its reporters.
pub struct SuiteBuilder {
    cfg: Config,
    reporters: Vec<Arc<dyn Reporter>>,
}

impl SuiteBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            reporters: Vec::new(),
        }
    }

    /// Replaces the reporter list.
    ///
    /// Reporters are called in this order for every result.
    pub fn with_reporters(mut self, reporters: Vec<Arc<dyn Reporter>>) -> Self {
        self.reporters = reporters;
        self
    }

    /// Appends one reporter.
    pub fn with_reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporters.push(reporter);
        self
    }

    /// Appends a built-in reporter resolved by name (see [`reporters::by_name`]).
    ///
    /// Fails with [`SetupError::UnknownReporter`] for names nothing can report to.
    pub fn with_reporter_named(self, name: &str) -> Result<Self, SetupError> {
        let reporter = reporters::by_name(name)?;
        Ok(self.with_reporter(reporter))
    }

    /// Builds the [`Suite`].
    pub fn build(self) -> Suite {
        Suite::new(self.cfg, self.reporters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_reporter_is_a_setup_error() {
        let err = SuiteBuilder::new(Config::default())
            .with_reporter_named("smoke-signals")
            .err();
        assert_eq!(
            err.map(|e| e.as_label()),
            Some("setup_unknown_reporter")
        );
    }

    #[test]
    fn test_named_reporters_build() {
        let built = SuiteBuilder::new(Config::default())
            .with_reporter_named("null")
            .and_then(|b| b.with_reporter_named("recorder"));
        assert!(built.is_ok());
    }
}
