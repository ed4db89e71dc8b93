//! Command-line surface of `mcp-stack`.
//!
//! Flags form the explicit tier of the configuration: anything given here
//! beats `MCP_*` variables, the configuration file, and the defaults.

use std::collections::BTreeMap;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

use crate::config::{Architecture, ConfigOverrides, FunctionUrlAuth};
use crate::synth::DEFAULT_OUT_DIR;

/// Top-level parser.
#[derive(Debug, Parser)]
#[command(
    name = "mcp-stack",
    about = "Assemble the deployment stack for a containerised MCP tool",
    version
)]
pub struct CommandLine {
    /// Configuration file to read instead of discovering `mcp-stack.toml`.
    #[arg(long, value_name = "PATH", global = true)]
    pub config_path: Option<Utf8PathBuf>,
    /// Selected action.
    #[command(subcommand)]
    pub command: Commands,
}

/// Actions supported by the binary.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Compose the stack and write its manifest.
    #[command(name = "synth")]
    Synth(SynthCommand),
    /// Print the composed stack as JSON without writing anything.
    #[command(name = "plan")]
    Plan(OverrideArgs),
}

/// Options for the `synth` command.
#[derive(Debug, Clone, PartialEq, Eq, Args)]
pub struct SynthCommand {
    /// Explicit configuration values.
    #[command(flatten)]
    pub overrides: OverrideArgs,
    /// Directory the stack manifest is written to.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_OUT_DIR)]
    pub out_dir: Utf8PathBuf,
}

/// Explicit configuration flags shared by every command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct OverrideArgs {
    /// Identifier every resource name is derived from.
    #[arg(long, value_name = "PREFIX")]
    pub project_prefix: Option<String>,
    /// Target account.
    #[arg(long = "account", value_name = "ID")]
    pub aws_account_id: Option<String>,
    /// Target region.
    #[arg(long = "region", value_name = "REGION")]
    pub aws_region: Option<String>,
    /// Function memory in MiB.
    #[arg(long, value_name = "MIB")]
    pub memory_size: Option<u32>,
    /// Function timeout in seconds.
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u32>,
    /// Instruction set of the function image.
    #[arg(long, value_enum)]
    pub architecture: Option<Architecture>,
    /// Container build context of the tool.
    #[arg(long, value_name = "PATH")]
    pub tool_path: Option<Utf8PathBuf>,
    /// Days the function logs are kept.
    #[arg(long, value_name = "DAYS")]
    pub log_retention_days: Option<u32>,
    /// Authorisation of the HTTP endpoint.
    #[arg(long = "function-url-auth", value_enum)]
    pub function_url_auth: Option<FunctionUrlAuth>,
    /// Additional stack tag; may be repeated.
    #[arg(long = "tag", value_name = "KEY=VALUE", value_parser = parse_tag)]
    pub tags: Vec<(String, String)>,
}

impl OverrideArgs {
    /// Convert the flags into the explicit configuration tier.
    #[must_use]
    pub fn to_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            project_prefix: self.project_prefix.clone(),
            aws_account_id: self.aws_account_id.clone(),
            aws_region: self.aws_region.clone(),
            memory_size: self.memory_size,
            timeout: self.timeout,
            architecture: self.architecture,
            tool_path: self.tool_path.clone(),
            log_retention_days: self.log_retention_days,
            function_url_auth: self.function_url_auth,
            tags: self.tags.iter().cloned().collect::<BTreeMap<_, _>>(),
        }
    }
}

fn parse_tag(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err(String::from("tag key must contain visible characters"));
    }
    Ok((trimmed.to_owned(), value.to_owned()))
}
