//! Layered resolution of [`DeploymentConfig`].

use camino::Utf8PathBuf;

use crate::env::EnvLookup;
use crate::error::ConfigResult;

use super::env_layer::environment_layer;
use super::file::{load_file_layer, locate};
use super::layer::{ConfigLayer, LayerComposer, LayerProvenance};
use super::validate::validate;
use super::{ConfigDefaults, ConfigOverrides, DeploymentConfig, RawConfig};

/// Resolves a [`DeploymentConfig`] from defaults, an optional file, the
/// environment and explicit overrides.
///
/// # Examples
///
/// ```
/// use mcp_stack::config::{ConfigOverrides, ConfigResolver};
/// use mcp_stack::env::MapEnv;
///
/// let env = MapEnv::new().with("MCP_AWS_REGION", "eu-west-1");
/// let config = ConfigResolver::new(&env)
///     .resolve(&ConfigOverrides::with_project_prefix("demo"))?;
/// assert_eq!(config.project_prefix(), "demo");
/// assert_eq!(config.aws_region(), Some("eu-west-1"));
/// assert_eq!(config.aws_account_id(), None);
/// # Ok::<_, mcp_stack::error::ConfigurationError>(())
/// ```
pub struct ConfigResolver<'a> {
    env: &'a dyn EnvLookup,
    defaults: ConfigDefaults,
    config_path: Option<Utf8PathBuf>,
    search_dir: Option<Utf8PathBuf>,
}

impl<'a> ConfigResolver<'a> {
    /// Create a resolver reading the environment tier from `env`.
    ///
    /// File discovery is disabled until [`Self::with_search_dir`] is called.
    #[must_use]
    pub fn new(env: &'a dyn EnvLookup) -> Self {
        Self {
            env,
            defaults: ConfigDefaults::default(),
            config_path: None,
            search_dir: None,
        }
    }

    /// Replace the compiled-in defaults tier.
    #[must_use]
    pub fn with_defaults(mut self, defaults: ConfigDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Read the file tier from `path`, which must exist.
    #[must_use]
    pub fn with_config_path(mut self, path: Option<Utf8PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    /// Look for the configuration file in `dir` when no path is named.
    #[must_use]
    pub fn with_search_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.search_dir = Some(dir.into());
        self
    }

    /// Collect every tier, lowest precedence first.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::error::ConfigurationError`] when a tier cannot be
    /// serialised or the configuration file cannot be read.
    pub fn compose_layers(&self, overrides: &ConfigOverrides) -> ConfigResult<LayerComposer> {
        let mut composer = LayerComposer::new();
        composer.push_layer(ConfigLayer::from_serialize(
            LayerProvenance::Defaults,
            &self.defaults,
        )?);
        if let Some(path) = locate(
            self.config_path.as_deref(),
            self.env,
            self.search_dir.as_deref(),
        ) {
            composer.push_layer(load_file_layer(&path)?);
        }
        composer.push_layer(environment_layer(self.env));
        composer.push_layer(ConfigLayer::from_serialize(
            LayerProvenance::Overrides,
            overrides,
        )?);
        Ok(composer)
    }

    /// Resolve the configuration once.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ConfigurationError::MissingField`] when the
    /// project prefix is absent or blank in every tier, and other
    /// [`crate::error::ConfigurationError`] variants for unreadable files,
    /// mistyped values, or fields that fail validation.
    pub fn resolve(&self, overrides: &ConfigOverrides) -> ConfigResult<DeploymentConfig> {
        let composer = self.compose_layers(overrides)?;
        for field in ["project_prefix", "aws_account_id", "aws_region"] {
            match composer.provenance_of(field) {
                Some(source) => tracing::debug!(field, %source, "resolved configuration field"),
                None => tracing::debug!(field, "configuration field left unset"),
            }
        }
        let raw: RawConfig = composer.to_figment().extract()?;
        let config = validate(raw)?;
        tracing::info!(
            project_prefix = config.project_prefix(),
            "deployment configuration resolved"
        );
        Ok(config)
    }
}
