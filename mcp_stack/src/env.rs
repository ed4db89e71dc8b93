//! Read-only access to environment variables.
//!
//! The resolver never reads the process environment directly. Callers pass an
//! [`EnvLookup`] so tests can supply a deterministic [`MapEnv`] while the
//! binary uses [`ProcessEnv`].

use std::collections::BTreeMap;

/// Variable consulted for the target account when configuration has none.
pub const DEFAULT_ACCOUNT_VAR: &str = "CDK_DEFAULT_ACCOUNT";

/// Variable consulted for the target region when configuration has none.
pub const DEFAULT_REGION_VAR: &str = "CDK_DEFAULT_REGION";

/// Read-only key/value view of an environment.
pub trait EnvLookup {
    /// Return the value stored under `key`, or `None` when it is unset.
    fn get(&self, key: &str) -> Option<String>;

    /// Like [`EnvLookup::get`] but treats blank values as unset.
    fn get_non_blank(&self, key: &str) -> Option<String> {
        self.get(key).filter(|value| !value.trim().is_empty())
    }
}

impl<T: EnvLookup + ?Sized> EnvLookup for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

/// Lookup backed by the real process environment.
///
/// Variables holding non-unicode data are reported as unset.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// In-memory lookup used by tests and embedders.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MapEnv(BTreeMap<String, String>);

impl MapEnv {
    /// Create an empty environment.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Return a copy of this environment with `key` set to `value`.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Set `key` to `value`, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Remove `key`, returning its previous value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }
}

impl EnvLookup for MapEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }
}

impl<K, V> FromIterator<(K, V)> for MapEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// Pick the first value present across an explicit, environment and default
/// tier, in that order.
///
/// Blank strings count as absent so an empty variable falls through to the
/// next tier instead of masking it.
#[must_use]
pub fn first_present(
    explicit: Option<&str>,
    env: Option<&str>,
    default: Option<&str>,
) -> Option<String> {
    [explicit, env, default]
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::explicit_wins(Some("e"), Some("v"), Some("d"), Some("e"))]
    #[case::env_when_no_explicit(None, Some("v"), Some("d"), Some("v"))]
    #[case::default_last(None, None, Some("d"), Some("d"))]
    #[case::nothing(None, None, None, None)]
    #[case::blank_explicit_falls_through(Some(""), Some("v"), None, Some("v"))]
    #[case::whitespace_env_falls_through(None, Some("  "), Some("d"), Some("d"))]
    #[case::all_blank(Some(""), Some(" "), Some(""), None)]
    fn first_present_applies_tier_order(
        #[case] explicit: Option<&str>,
        #[case] env: Option<&str>,
        #[case] default: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(
            first_present(explicit, env, default).as_deref(),
            expected
        );
    }

    #[rstest]
    fn map_env_reports_unset_keys_as_none() {
        let env = MapEnv::new().with("PRESENT", "1");
        assert_eq!(env.get("PRESENT").as_deref(), Some("1"));
        assert_eq!(env.get("ABSENT"), None);
    }

    #[rstest]
    fn get_non_blank_filters_empty_values() {
        let env: MapEnv = [("EMPTY", ""), ("SPACES", "   "), ("SET", "x")]
            .into_iter()
            .collect();
        assert_eq!(env.get_non_blank("EMPTY"), None);
        assert_eq!(env.get_non_blank("SPACES"), None);
        assert_eq!(env.get_non_blank("SET").as_deref(), Some("x"));
    }
}
