//! Validation of merged configuration values.
//!
//! Every failing field is reported, aggregated into a single
//! [`ConfigurationError`] so one run surfaces all problems.

use std::ops::RangeInclusive;

use crate::error::{ConfigResult, ConfigurationError};

use super::{DeploymentConfig, RawConfig, env_var_for};

const MEMORY_RANGE: RangeInclusive<u32> = 128..=10_240;
const TIMEOUT_RANGE: RangeInclusive<u32> = 1..=900;
const RETENTION_DAYS: &[u32] = &[
    1, 3, 5, 7, 14, 30, 60, 90, 120, 150, 180, 365, 400, 545, 731, 1096, 1827, 2192, 2557, 2922,
    3288, 3653,
];
const MAX_TAG_KEY: usize = 128;
const MAX_TAG_VALUE: usize = 256;

#[derive(Default)]
struct Issues(Vec<ConfigurationError>);

impl Issues {
    fn invalid(&mut self, key: &'static str, message: impl Into<String>) {
        self.0.push(ConfigurationError::Validation {
            key,
            message: message.into(),
        });
    }

    fn require<T>(&mut self, field: &'static str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.0.push(ConfigurationError::MissingField {
                field,
                env_var: env_var_for(field),
            });
        }
        value
    }
}

fn check_prefix(prefix: &str, issues: &mut Issues) {
    if !prefix.chars().next().is_some_and(|c| c.is_ascii_alphanumeric()) {
        issues.invalid("project_prefix", "must start with an ASCII letter or digit");
    }
    if !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        issues.invalid(
            "project_prefix",
            "may only contain ASCII letters, digits, and hyphens",
        );
    }
}

fn check_range(key: &'static str, value: u32, range: &RangeInclusive<u32>, issues: &mut Issues) {
    if !range.contains(&value) {
        issues.invalid(
            key,
            format!(
                "{value} is outside the accepted range {}..={}",
                range.start(),
                range.end()
            ),
        );
    }
}

fn check_tags<'a>(tags: impl IntoIterator<Item = (&'a String, &'a String)>, issues: &mut Issues) {
    for (key, value) in tags {
        if key.trim().is_empty() {
            issues.invalid("tags", "tag keys must contain visible characters");
        } else if key.len() > MAX_TAG_KEY {
            issues.invalid("tags", format!("tag key '{key}' exceeds {MAX_TAG_KEY} characters"));
        }
        if value.len() > MAX_TAG_VALUE {
            issues.invalid(
                "tags",
                format!("value of tag '{key}' exceeds {MAX_TAG_VALUE} characters"),
            );
        }
    }
}

/// Turn merged values into a [`DeploymentConfig`], collecting every failure.
pub(super) fn validate(raw: RawConfig) -> ConfigResult<DeploymentConfig> {
    let mut issues = Issues::default();

    let project_prefix = issues.require("project_prefix", raw.project_prefix);
    let memory_size = issues.require("memory_size", raw.memory_size);
    let timeout = issues.require("timeout", raw.timeout);
    let architecture = issues.require("architecture", raw.architecture);
    let tool_path = issues.require("tool_path", raw.tool_path);
    let log_retention_days = issues.require("log_retention_days", raw.log_retention_days);
    let function_url_auth = issues.require("function_url_auth", raw.function_url_auth);

    if let Some(prefix) = &project_prefix {
        check_prefix(prefix, &mut issues);
    }
    if let Some(memory) = memory_size {
        check_range("memory_size", memory, &MEMORY_RANGE, &mut issues);
    }
    if let Some(seconds) = timeout {
        check_range("timeout", seconds, &TIMEOUT_RANGE, &mut issues);
    }
    if let Some(days) = log_retention_days
        && !RETENTION_DAYS.contains(&days)
    {
        issues.invalid(
            "log_retention_days",
            format!("{days} is not a supported retention period"),
        );
    }
    check_tags(&raw.tags, &mut issues);

    match (
        project_prefix,
        memory_size,
        timeout,
        architecture,
        tool_path,
        log_retention_days,
        function_url_auth,
    ) {
        (
            Some(project_prefix),
            Some(memory_size),
            Some(timeout),
            Some(architecture),
            Some(tool_path),
            Some(log_retention_days),
            Some(function_url_auth),
        ) if issues.0.is_empty() => Ok(DeploymentConfig {
            project_prefix,
            aws_account_id: raw.aws_account_id,
            aws_region: raw.aws_region,
            memory_size,
            timeout,
            architecture,
            tool_path,
            log_retention_days,
            function_url_auth,
            tags: raw.tags,
        }),
        _ => Err(ConfigurationError::try_aggregate(issues.0).unwrap_or_else(|| {
            ConfigurationError::Validation {
                key: "configuration",
                message: String::from("incomplete configuration"),
            }
        })),
    }
}
