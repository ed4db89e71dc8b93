//! Several [`ConfigurationError`]s reported as one.

use std::{error::Error, fmt};

use super::ConfigurationError;

/// Every failure found while validating one resolution, in discovery order.
#[derive(Debug)]
pub struct AggregatedErrors(Vec<ConfigurationError>);

impl AggregatedErrors {
    /// Wrap `errors`.
    #[must_use]
    pub const fn new(errors: Vec<ConfigurationError>) -> Self {
        Self(errors)
    }

    /// Iterate over the contained errors.
    pub fn iter(&self) -> impl Iterator<Item = &ConfigurationError> {
        self.0.iter()
    }
}

/// Renders one numbered line per error.
impl fmt::Display for AggregatedErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut separator = "";
        for (number, err) in (1..).zip(&self.0) {
            write!(f, "{separator}{number}: {err}")?;
            separator = "\n";
        }
        Ok(())
    }
}

impl Error for AggregatedErrors {}
