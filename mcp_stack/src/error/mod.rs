//! Error types produced while resolving configuration and emitting stacks.
//!
//! [`ConfigurationError`] covers every failure that can happen before a
//! deployment unit exists. [`SynthesisError`] covers the hand-off to the
//! provisioning engine, and [`StackError`] joins both at the pipeline
//! boundary so `main` can report a single error type.

mod aggregate;

use camino::Utf8PathBuf;
use figment::Error as FigmentError;
use thiserror::Error;

pub use aggregate::AggregatedErrors;

/// Errors raised while resolving the deployment configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// A required field was absent or blank in every configuration tier.
    #[error(
        "required configuration field '{field}' is not set; pass it explicitly, \
         export {env_var}, or add it to the configuration file"
    )]
    MissingField {
        /// Name of the unresolved field.
        field: &'static str,
        /// Environment variable that would have supplied the field.
        env_var: String,
    },

    /// A field resolved to a value outside its accepted domain.
    #[error("Validation failed for '{key}': {message}")]
    Validation {
        /// Configuration key that failed validation.
        key: &'static str,
        /// Human-readable explanation of the validation failure.
        message: String,
    },

    /// The configuration file could not be read or parsed.
    #[error("Configuration file error in '{path}': {source}")]
    File {
        /// Path of the offending file.
        path: Utf8PathBuf,
        /// Underlying I/O or parse failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Layered values could not be extracted into the configuration shape.
    #[error("Failed to gather configuration: {0}")]
    Gathering(#[from] Box<FigmentError>),

    /// Several fields failed at once.
    #[error("multiple configuration errors:\n{0}")]
    Aggregate(AggregatedErrors),
}

impl ConfigurationError {
    /// Collapse `errors` into a single error.
    ///
    /// Returns `None` for an empty list, the sole error for a single entry,
    /// and [`Self::Aggregate`] otherwise.
    #[must_use]
    pub fn try_aggregate(mut errors: Vec<Self>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(Self::Aggregate(AggregatedErrors::new(errors))),
        }
    }

    /// Build a [`Self::File`] error for `path`.
    pub fn file(
        path: impl Into<Utf8PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::File {
            path: path.into(),
            source: source.into(),
        }
    }
}

impl From<FigmentError> for ConfigurationError {
    fn from(e: FigmentError) -> Self {
        Self::Gathering(Box::new(e))
    }
}

/// Errors raised while handing a deployment unit to the provisioning engine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SynthesisError {
    /// The output directory or artifact could not be written.
    #[error("failed to write stack artifact '{path}': {source}")]
    Io {
        /// Artifact or directory path involved in the failure.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The deployment unit could not be encoded.
    #[error("failed to encode stack '{stack_id}': {source}")]
    Encode {
        /// Identifier of the stack being encoded.
        stack_id: String,
        /// Underlying serialisation failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Errors surfaced by the resolve, compose and synthesize pipeline.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StackError {
    /// Configuration could not be resolved; nothing was synthesized.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The provisioning engine rejected the deployment unit.
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),

    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigurationError>;
