//! Deployment configuration and its layered resolution.
//!
//! A [`DeploymentConfig`] is resolved once per run by [`ConfigResolver`] from
//! four tiers, highest precedence first:
//!
//! 1. explicit [`ConfigOverrides`] (command-line flags or programmatic input);
//! 2. `MCP_*` environment variables read through an
//!    [`EnvLookup`](crate::env::EnvLookup);
//! 3. an optional TOML configuration file;
//! 4. compiled-in [`ConfigDefaults`].
//!
//! Precedence is applied per field, so overriding one field leaves every other
//! field free to fall back independently. Blank strings count as absent in
//! every tier.

mod env_layer;
mod file;
mod layer;
mod resolver;
mod validate;

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub use file::{CONFIG_FILE_NAME, CONFIG_PATH_VAR};
pub use layer::{ConfigLayer, LayerComposer, LayerProvenance};
pub use resolver::ConfigResolver;

/// Prefix shared by every configuration environment variable.
pub const ENV_PREFIX: &str = "MCP_";

/// Project prefix used when no tier supplies one.
pub const DEFAULT_PROJECT_PREFIX: &str = "mcp-tool";

/// Function memory in MiB used when no tier supplies one.
pub const DEFAULT_MEMORY_SIZE: u32 = 1024;

/// Function timeout in seconds used when no tier supplies one.
pub const DEFAULT_TIMEOUT: u32 = 30;

/// Log retention in days used when no tier supplies one.
pub const DEFAULT_LOG_RETENTION_DAYS: u32 = 7;

/// Container build context used when no tier supplies one.
pub const DEFAULT_TOOL_PATH: &str = "../mcp-tool";

/// Return the environment variable that feeds `field`.
///
/// # Examples
///
/// ```
/// assert_eq!(mcp_stack::config::env_var_for("project_prefix"), "MCP_PROJECT_PREFIX");
/// ```
#[must_use]
pub fn env_var_for(field: &str) -> String {
    format!("{ENV_PREFIX}{}", field.to_ascii_uppercase())
}

/// Instruction set the function image is built for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
pub enum Architecture {
    /// 64-bit ARM (Graviton).
    #[default]
    #[serde(rename = "arm64")]
    #[value(name = "arm64")]
    Arm64,
    /// 64-bit x86.
    #[serde(rename = "x86_64")]
    #[value(name = "x86_64")]
    X86_64,
}

/// Authorisation applied to the function's HTTP endpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
pub enum FunctionUrlAuth {
    /// Publicly invocable endpoint.
    #[default]
    #[serde(rename = "none")]
    #[value(name = "none")]
    Public,
    /// Callers must sign requests with IAM credentials.
    #[serde(rename = "aws_iam")]
    #[value(name = "aws_iam")]
    AwsIam,
}

/// Fully resolved, immutable deployment configuration.
///
/// Instances are only produced by [`ConfigResolver::resolve`], which
/// guarantees the project prefix is present and every field is valid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentConfig {
    project_prefix: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    aws_account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    aws_region: Option<String>,
    memory_size: u32,
    timeout: u32,
    architecture: Architecture,
    tool_path: Utf8PathBuf,
    log_retention_days: u32,
    function_url_auth: FunctionUrlAuth,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    tags: BTreeMap<String, String>,
}

impl DeploymentConfig {
    /// Stable identifier every derived resource name starts with.
    #[must_use]
    pub fn project_prefix(&self) -> &str {
        &self.project_prefix
    }

    /// Target account, when one was configured.
    #[must_use]
    pub fn aws_account_id(&self) -> Option<&str> {
        self.aws_account_id.as_deref()
    }

    /// Target region, when one was configured.
    #[must_use]
    pub fn aws_region(&self) -> Option<&str> {
        self.aws_region.as_deref()
    }

    /// Function memory in MiB.
    #[must_use]
    pub const fn memory_size(&self) -> u32 {
        self.memory_size
    }

    /// Function timeout in seconds.
    #[must_use]
    pub const fn timeout(&self) -> u32 {
        self.timeout
    }

    /// Instruction set of the function image.
    #[must_use]
    pub const fn architecture(&self) -> Architecture {
        self.architecture
    }

    /// Container build context of the packaged tool.
    #[must_use]
    pub fn tool_path(&self) -> &Utf8Path {
        &self.tool_path
    }

    /// Days the function's logs are kept.
    #[must_use]
    pub const fn log_retention_days(&self) -> u32 {
        self.log_retention_days
    }

    /// Authorisation mode of the HTTP endpoint.
    #[must_use]
    pub const fn function_url_auth(&self) -> FunctionUrlAuth {
        self.function_url_auth
    }

    /// Additional tags requested by the operator.
    #[must_use]
    pub const fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }
}

/// Explicit, highest-precedence configuration values.
///
/// Every `None` (or blank string) leaves the field to the lower tiers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConfigOverrides {
    /// Project prefix override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_prefix: Option<String>,
    /// Account override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aws_account_id: Option<String>,
    /// Region override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aws_region: Option<String>,
    /// Memory override in MiB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_size: Option<u32>,
    /// Timeout override in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
    /// Architecture override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub architecture: Option<Architecture>,
    /// Container build context override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_path: Option<Utf8PathBuf>,
    /// Log retention override in days.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_retention_days: Option<u32>,
    /// Endpoint authorisation override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_url_auth: Option<FunctionUrlAuth>,
    /// Extra tags merged over those from lower tiers.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

impl ConfigOverrides {
    /// Overrides that only set the project prefix.
    #[must_use]
    pub fn with_project_prefix(prefix: impl Into<String>) -> Self {
        Self {
            project_prefix: Some(prefix.into()),
            ..Self::default()
        }
    }
}

/// Compiled-in lowest tier.
///
/// [`ConfigDefaults::default`] carries the shipped defaults; embedders and
/// tests may replace it through [`ConfigResolver::with_defaults`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConfigDefaults {
    /// Default project prefix; `None` makes the prefix mandatory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_prefix: Option<String>,
    /// Default memory in MiB.
    pub memory_size: u32,
    /// Default timeout in seconds.
    pub timeout: u32,
    /// Default architecture.
    pub architecture: Architecture,
    /// Default container build context.
    pub tool_path: Utf8PathBuf,
    /// Default log retention in days.
    pub log_retention_days: u32,
    /// Default endpoint authorisation.
    pub function_url_auth: FunctionUrlAuth,
}

impl Default for ConfigDefaults {
    fn default() -> Self {
        Self {
            project_prefix: Some(String::from(DEFAULT_PROJECT_PREFIX)),
            memory_size: DEFAULT_MEMORY_SIZE,
            timeout: DEFAULT_TIMEOUT,
            architecture: Architecture::default(),
            tool_path: Utf8PathBuf::from(DEFAULT_TOOL_PATH),
            log_retention_days: DEFAULT_LOG_RETENTION_DAYS,
            function_url_auth: FunctionUrlAuth::default(),
        }
    }
}

impl ConfigDefaults {
    /// Shipped defaults without a project prefix, forcing callers to supply
    /// one from a higher tier.
    #[must_use]
    pub fn without_project_prefix() -> Self {
        Self {
            project_prefix: None,
            ..Self::default()
        }
    }
}

/// Shape extracted from the merged layers before validation.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    project_prefix: Option<String>,
    aws_account_id: Option<String>,
    aws_region: Option<String>,
    memory_size: Option<u32>,
    timeout: Option<u32>,
    architecture: Option<Architecture>,
    tool_path: Option<Utf8PathBuf>,
    log_retention_days: Option<u32>,
    function_url_auth: Option<FunctionUrlAuth>,
    #[serde(default)]
    tags: BTreeMap<String, String>,
}
