//! Assembly of the deployment unit handed to the provisioning engine.
//!
//! [`EnvironmentDescriptor::derive`] settles where the stack is deployed and
//! [`compose`] wires the resolved configuration into a [`DeploymentUnit`].
//! Neither step can fail: everything that could be invalid was rejected by
//! the resolver.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::DeploymentConfig;
use crate::env::{DEFAULT_ACCOUNT_VAR, DEFAULT_REGION_VAR, EnvLookup, first_present};

/// Suffix appended to the project prefix to form the stack identifier.
pub const STACK_SUFFIX: &str = "-stack";

/// Region used when neither configuration nor environment names one.
pub const FALLBACK_REGION: &str = "us-west-2";

/// Description attached to every stack.
pub const STACK_DESCRIPTION: &str = "MCP Docker Lambda Template - Containerized MCP tool on Lambda";

/// Tag carrying the project prefix.
pub const PROJECT_TAG: &str = "Project";

/// Tag naming the tool that manages the stack.
pub const MANAGED_BY_TAG: &str = "ManagedBy";

/// Value of [`MANAGED_BY_TAG`].
pub const MANAGED_BY: &str = "CDK";

/// Account and region a stack is deployed to.
///
/// An absent account is kept absent so the provisioning engine can apply its
/// own environment-agnostic defaults. The region is always concrete.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EnvironmentDescriptor {
    #[serde(skip_serializing_if = "Option::is_none")]
    account: Option<String>,
    region: String,
}

impl EnvironmentDescriptor {
    /// Build a descriptor from already-resolved values.
    #[must_use]
    pub fn new(account: Option<String>, region: impl Into<String>) -> Self {
        Self {
            account,
            region: region.into(),
        }
    }

    /// Derive the target environment for `config`.
    ///
    /// The account falls back from configuration to [`DEFAULT_ACCOUNT_VAR`]
    /// and then stays absent. The region falls back from configuration to
    /// [`DEFAULT_REGION_VAR`] and then to [`FALLBACK_REGION`].
    ///
    /// # Examples
    ///
    /// ```
    /// use mcp_stack::config::{ConfigOverrides, ConfigResolver};
    /// use mcp_stack::env::MapEnv;
    /// use mcp_stack::stack::EnvironmentDescriptor;
    ///
    /// let env = MapEnv::new();
    /// let config = ConfigResolver::new(&env).resolve(&ConfigOverrides::default())?;
    /// let target = EnvironmentDescriptor::derive(&config, &env);
    /// assert_eq!(target.account(), None);
    /// assert_eq!(target.region(), "us-west-2");
    /// # Ok::<_, mcp_stack::error::ConfigurationError>(())
    /// ```
    #[must_use]
    pub fn derive(config: &DeploymentConfig, env: &dyn EnvLookup) -> Self {
        let account = first_present(
            config.aws_account_id(),
            env.get(DEFAULT_ACCOUNT_VAR).as_deref(),
            None,
        );
        let region = first_present(
            config.aws_region(),
            env.get(DEFAULT_REGION_VAR).as_deref(),
            Some(FALLBACK_REGION),
        )
        .unwrap_or_else(|| FALLBACK_REGION.to_owned());
        tracing::debug!(account = ?account, %region, "derived deployment environment");
        Self { account, region }
    }

    /// Target account, if one is pinned.
    #[must_use]
    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    /// Target region.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }
}

/// Declarative stack handed to the provisioning engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeploymentUnit {
    id: String,
    config: DeploymentConfig,
    env: EnvironmentDescriptor,
    description: String,
    tags: BTreeMap<String, String>,
}

impl DeploymentUnit {
    /// Stack identifier, `"{project_prefix}-stack"`.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Configuration the stack was composed from.
    #[must_use]
    pub const fn config(&self) -> &DeploymentConfig {
        &self.config
    }

    /// Target environment.
    #[must_use]
    pub const fn env(&self) -> &EnvironmentDescriptor {
        &self.env
    }

    /// Human-readable stack description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Tags applied to every resource in the stack.
    #[must_use]
    pub const fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    /// Value of tag `key`, if set.
    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}

/// Compose the deployment unit for `config` targeting `env`.
///
/// Operator tags are applied first; [`PROJECT_TAG`] and [`MANAGED_BY_TAG`]
/// are written last and always carry their fixed meaning.
#[must_use]
pub fn compose(config: DeploymentConfig, env: EnvironmentDescriptor) -> DeploymentUnit {
    let id = format!("{}{STACK_SUFFIX}", config.project_prefix());
    let mut tags = config.tags().clone();
    for reserved in [PROJECT_TAG, MANAGED_BY_TAG] {
        if tags.contains_key(reserved) {
            tracing::warn!(tag = reserved, "ignoring operator value for reserved tag");
        }
    }
    tags.insert(PROJECT_TAG.to_owned(), config.project_prefix().to_owned());
    tags.insert(MANAGED_BY_TAG.to_owned(), MANAGED_BY.to_owned());
    tracing::info!(stack = %id, region = env.region(), "composed deployment unit");
    DeploymentUnit {
        id,
        config,
        env,
        description: STACK_DESCRIPTION.to_owned(),
        tags,
    }
}
