//! Environment tier of the configuration.
//!
//! Probes `MCP_<FIELD>` for every known field through an injected
//! [`EnvLookup`]. Text fields are taken verbatim so values such as account
//! identifiers keep their leading zeros; numeric fields are parsed into Figment
//! values and left for extraction to type-check.

use figment::value::{Dict, Value};

use crate::env::EnvLookup;

use super::env_var_for;
use super::layer::{ConfigLayer, LayerProvenance};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ValueKind {
    Text,
    Number,
}

const FIELDS: &[(&str, ValueKind)] = &[
    ("project_prefix", ValueKind::Text),
    ("aws_account_id", ValueKind::Text),
    ("aws_region", ValueKind::Text),
    ("memory_size", ValueKind::Number),
    ("timeout", ValueKind::Number),
    ("architecture", ValueKind::Text),
    ("tool_path", ValueKind::Text),
    ("log_retention_days", ValueKind::Number),
    ("function_url_auth", ValueKind::Text),
];

fn parse_value(raw: &str, kind: ValueKind) -> Value {
    let trimmed = raw.trim();
    match kind {
        ValueKind::Text => Value::from(trimmed.to_owned()),
        ValueKind::Number => trimmed
            .parse::<u64>()
            .map_or_else(|_| Value::from(trimmed.to_owned()), Value::from),
    }
}

/// Collect the environment layer from `env`.
pub(super) fn environment_layer(env: &dyn EnvLookup) -> ConfigLayer {
    let mut values = Dict::new();
    for &(field, kind) in FIELDS {
        let var = env_var_for(field);
        if let Some(raw) = env.get_non_blank(&var) {
            tracing::debug!(%var, field, "configuration value supplied by environment");
            values.insert(field.to_owned(), parse_value(&raw, kind));
        }
    }
    ConfigLayer::new(LayerProvenance::Environment, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MapEnv;
    use rstest::rstest;

    #[rstest]
    fn account_ids_stay_textual() {
        let env = MapEnv::new().with("MCP_AWS_ACCOUNT_ID", "012345678901");
        let layer = environment_layer(&env);
        assert_eq!(
            layer.get("aws_account_id").and_then(Value::as_str),
            Some("012345678901")
        );
    }

    #[rstest]
    fn numeric_fields_are_parsed() {
        let env = MapEnv::new().with("MCP_MEMORY_SIZE", " 2048 ");
        let memory: u32 = figment::Figment::from(environment_layer(&env))
            .extract_inner("memory_size")
            .expect("memory size should extract as a number");
        assert_eq!(memory, 2048);
    }

    #[rstest]
    fn unparsable_numbers_are_kept_as_text() {
        let env = MapEnv::new().with("MCP_TIMEOUT", "soon");
        let layer = environment_layer(&env);
        assert_eq!(layer.get("timeout").and_then(Value::as_str), Some("soon"));
    }

    #[rstest]
    fn unrelated_and_blank_variables_are_ignored() {
        let env = MapEnv::new()
            .with("MCP_AWS_REGION", "")
            .with("PROJECT_PREFIX", "unprefixed")
            .with("MCP_UNKNOWN", "x");
        assert!(environment_layer(&env).is_empty());
    }
}
