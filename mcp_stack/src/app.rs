//! The resolve, derive, compose and synthesize pipeline.

use crate::config::{ConfigOverrides, ConfigResolver};
use crate::env::EnvLookup;
use crate::error::{ConfigResult, StackError};
use crate::stack::{DeploymentUnit, EnvironmentDescriptor, compose};
use crate::synth::Synthesizer;

/// One deployment run: resolves configuration once, composes one unit and
/// hands it to the synthesizer.
///
/// [`StackApp::run`] consumes the app so a run cannot be repeated.
pub struct StackApp<'a, S> {
    resolver: ConfigResolver<'a>,
    env: &'a dyn EnvLookup,
    synthesizer: S,
}

impl<'a, S: Synthesizer> StackApp<'a, S> {
    /// Create a run from its collaborators.
    ///
    /// `env` feeds the account and region fallbacks and should be the same
    /// lookup the resolver reads.
    #[must_use]
    pub fn new(resolver: ConfigResolver<'a>, env: &'a dyn EnvLookup, synthesizer: S) -> Self {
        Self {
            resolver,
            env,
            synthesizer,
        }
    }

    /// Resolve configuration and compose the deployment unit without
    /// synthesizing it.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::error::ConfigurationError`] when resolution fails.
    pub fn plan(&self, overrides: &ConfigOverrides) -> ConfigResult<DeploymentUnit> {
        let config = self.resolver.resolve(overrides)?;
        let target = EnvironmentDescriptor::derive(&config, self.env);
        Ok(compose(config, target))
    }

    /// Run the pipeline to completion.
    ///
    /// # Errors
    ///
    /// Returns [`StackError::Configuration`] when resolution fails, in which
    /// case the synthesizer is never called, and [`StackError::Synthesis`]
    /// when the synthesizer rejects the unit.
    pub fn run(mut self, overrides: &ConfigOverrides) -> Result<(), StackError> {
        let unit = self.plan(overrides)?;
        self.synthesizer.synthesize(unit)?;
        Ok(())
    }
}
