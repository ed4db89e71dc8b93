//! Configuration layers and the composer that stacks them.
//!
//! Each tier is captured as a [`ConfigLayer`] holding a Figment [`Dict`] and
//! its [`LayerProvenance`]. Layers are pushed lowest precedence first and
//! merged into a [`Figment`] in that order, so later layers win per key.

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use figment::value::{Dict, Map, Value};
use figment::{Error, Figment, Metadata, Profile, Provider};
use serde::Serialize;

/// Tier a configuration layer originates from.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
#[non_exhaustive]
pub enum LayerProvenance {
    /// Values compiled into the binary.
    Defaults,
    /// Values loaded from the configuration file.
    File,
    /// Values collected from `MCP_*` environment variables.
    Environment,
    /// Explicit values supplied by the caller.
    Overrides,
}

impl LayerProvenance {
    /// Human-readable name used in logs and error metadata.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Defaults => "defaults",
            Self::File => "configuration file",
            Self::Environment => "environment variables",
            Self::Overrides => "explicit overrides",
        }
    }
}

impl fmt::Display for LayerProvenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One tier of configuration values.
///
/// Blank strings and empty values are dropped on construction so they never
/// mask a lower tier.
#[derive(Clone, Debug)]
pub struct ConfigLayer {
    provenance: LayerProvenance,
    values: Dict,
    path: Option<Utf8PathBuf>,
}

impl ConfigLayer {
    /// Build a layer from already-collected values.
    #[must_use]
    pub fn new(provenance: LayerProvenance, values: Dict) -> Self {
        Self {
            provenance,
            values: strip_blank(values),
            path: None,
        }
    }

    /// Build a layer by serialising `value` into a table.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] when `value` cannot be serialised or does
    /// not serialise to a table.
    pub fn from_serialize<T: Serialize>(
        provenance: LayerProvenance,
        value: &T,
    ) -> Result<Self, Error> {
        let dict = Value::serialize(value)?
            .into_dict()
            .ok_or_else(|| Error::from(format!("{provenance} must serialise to a table")))?;
        Ok(Self::new(provenance, dict))
    }

    /// Record the file this layer was read from.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Tier this layer belongs to.
    #[must_use]
    pub const fn provenance(&self) -> LayerProvenance {
        self.provenance
    }

    /// File the layer was read from, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8Path> {
        self.path.as_deref()
    }

    /// Value stored under `key` in this layer.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Whether the layer carries no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Provider for ConfigLayer {
    fn metadata(&self) -> Metadata {
        match &self.path {
            Some(path) => Metadata::named(format!("{} '{path}'", self.provenance)),
            None => Metadata::named(self.provenance.label()),
        }
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        Ok(Profile::Default.collect(self.values.clone()))
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::String(_, text) => text.trim().is_empty(),
        Value::Empty(..) => true,
        _ => false,
    }
}

fn strip_blank(values: Dict) -> Dict {
    values
        .into_iter()
        .filter(|(_, value)| !is_blank(value))
        .map(|(key, value)| match value {
            Value::Dict(tag, nested) => (key, Value::Dict(tag, strip_blank(nested))),
            other => (key, other),
        })
        .collect()
}

/// Builder that accumulates [`ConfigLayer`] instances, lowest precedence
/// first.
#[derive(Debug, Default)]
pub struct LayerComposer {
    layers: Vec<ConfigLayer>,
}

impl LayerComposer {
    /// Create an empty composer.
    #[must_use]
    pub const fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Push a layer above every layer pushed so far.
    pub fn push_layer(&mut self, layer: ConfigLayer) {
        tracing::trace!(
            provenance = %layer.provenance(),
            keys = layer.values.len(),
            "pushing configuration layer"
        );
        self.layers.push(layer);
    }

    /// Borrow the accumulated layers in push order.
    #[must_use]
    pub fn layers(&self) -> &[ConfigLayer] {
        &self.layers
    }

    /// Highest-precedence tier that supplies `key`, if any does.
    #[must_use]
    pub fn provenance_of(&self, key: &str) -> Option<LayerProvenance> {
        self.layers
            .iter()
            .rev()
            .find(|layer| layer.get(key).is_some())
            .map(ConfigLayer::provenance)
    }

    /// Merge every layer into a single [`Figment`].
    #[must_use]
    pub fn to_figment(&self) -> Figment {
        self.layers
            .iter()
            .cloned()
            .fold(Figment::new(), Figment::merge)
    }
}

impl IntoIterator for LayerComposer {
    type Item = ConfigLayer;
    type IntoIter = std::vec::IntoIter<ConfigLayer>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Probe {
        name: Option<String>,
        size: Option<u32>,
    }

    fn layer(provenance: LayerProvenance, pairs: &[(&str, Value)]) -> ConfigLayer {
        let values = pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), value.clone()))
            .collect();
        ConfigLayer::new(provenance, values)
    }

    #[rstest]
    fn later_layers_win_per_key() {
        let mut composer = LayerComposer::new();
        composer.push_layer(layer(
            LayerProvenance::Defaults,
            &[("name", Value::from("base")), ("size", Value::from(1_u32))],
        ));
        composer.push_layer(layer(
            LayerProvenance::Overrides,
            &[("name", Value::from("top"))],
        ));

        let probe: Probe = composer
            .to_figment()
            .extract()
            .expect("layers should extract");
        assert_eq!(probe.name.as_deref(), Some("top"));
        assert_eq!(probe.size, Some(1));
        assert_eq!(
            composer.provenance_of("size"),
            Some(LayerProvenance::Defaults)
        );
        assert_eq!(
            composer.provenance_of("name"),
            Some(LayerProvenance::Overrides)
        );
        assert_eq!(composer.provenance_of("missing"), None);
    }

    #[rstest]
    #[case::empty("")]
    #[case::spaces("   ")]
    fn blank_strings_do_not_mask_lower_layers(#[case] blank: &str) {
        let mut composer = LayerComposer::new();
        composer.push_layer(layer(
            LayerProvenance::Defaults,
            &[("name", Value::from("base"))],
        ));
        composer.push_layer(layer(
            LayerProvenance::Environment,
            &[("name", Value::from(blank))],
        ));

        let probe: Probe = composer
            .to_figment()
            .extract()
            .expect("layers should extract");
        assert_eq!(probe.name.as_deref(), Some("base"));
    }

    #[rstest]
    fn file_layer_metadata_names_the_path() {
        let layer = ConfigLayer::new(LayerProvenance::File, Dict::new()).with_path("conf/app.toml");
        assert_eq!(layer.path(), Some(Utf8Path::new("conf/app.toml")));
        assert!(layer.metadata().name.contains("conf/app.toml"));
    }
}
