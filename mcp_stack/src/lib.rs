//! Bootstrap for the deployment stack of a containerised MCP tool.
//!
//! The crate resolves a [`config::DeploymentConfig`] from explicit overrides,
//! `MCP_*` environment variables, an optional `mcp-stack.toml` file and
//! compiled-in defaults, derives the target [`stack::EnvironmentDescriptor`],
//! composes a [`stack::DeploymentUnit`] and hands it to a
//! [`synth::Synthesizer`]. [`app::StackApp`] strings the steps together.

pub mod app;
pub mod cli;
pub mod config;
pub mod env;
pub mod error;
pub mod stack;
pub mod synth;

pub use app::StackApp;
pub use config::{ConfigOverrides, ConfigResolver, DeploymentConfig};
pub use error::{ConfigurationError, StackError, SynthesisError};
pub use stack::{DeploymentUnit, EnvironmentDescriptor, compose};
pub use synth::{ManifestSynthesizer, Synthesizer};
