//! Hand-off of a composed stack to the provisioning engine.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};

use crate::error::SynthesisError;
use crate::stack::DeploymentUnit;

/// Directory the manifest synthesizer writes to by default.
pub const DEFAULT_OUT_DIR: &str = "cdk.out";

/// Terminal consumer of a [`DeploymentUnit`].
///
/// Synthesis is one-shot: the unit is moved in and never handed back.
pub trait Synthesizer {
    /// Translate `unit` into the engine-specific artifact.
    ///
    /// # Errors
    ///
    /// Returns a [`SynthesisError`] when the artifact cannot be produced.
    fn synthesize(&mut self, unit: DeploymentUnit) -> Result<(), SynthesisError>;
}

impl<S: Synthesizer + ?Sized> Synthesizer for &mut S {
    fn synthesize(&mut self, unit: DeploymentUnit) -> Result<(), SynthesisError> {
        (**self).synthesize(unit)
    }
}

/// Writes each unit as pretty-printed JSON to `<out_dir>/<id>.json`.
#[derive(Clone, Debug)]
pub struct ManifestSynthesizer {
    out_dir: Utf8PathBuf,
}

impl ManifestSynthesizer {
    /// Create a synthesizer writing under `out_dir`.
    #[must_use]
    pub fn new(out_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// Directory artifacts are written to.
    #[must_use]
    pub fn out_dir(&self) -> &Utf8Path {
        &self.out_dir
    }

    /// Path of the artifact written for stack `id`.
    #[must_use]
    pub fn artifact_path(&self, id: &str) -> Utf8PathBuf {
        self.out_dir.join(format!("{id}.json"))
    }
}

impl Default for ManifestSynthesizer {
    fn default() -> Self {
        Self::new(DEFAULT_OUT_DIR)
    }
}

impl Synthesizer for ManifestSynthesizer {
    fn synthesize(&mut self, unit: DeploymentUnit) -> Result<(), SynthesisError> {
        let io_error = |source| SynthesisError::Io {
            path: self.out_dir.clone(),
            source,
        };
        Dir::create_ambient_dir_all(&self.out_dir, ambient_authority()).map_err(io_error)?;
        let dir = Dir::open_ambient_dir(&self.out_dir, ambient_authority()).map_err(io_error)?;

        let mut manifest =
            serde_json::to_vec_pretty(&unit).map_err(|source| SynthesisError::Encode {
                stack_id: unit.id().to_owned(),
                source,
            })?;
        manifest.push(b'\n');

        let file_name = format!("{}.json", unit.id());
        dir.write(&file_name, manifest)
            .map_err(|source| SynthesisError::Io {
                path: self.artifact_path(unit.id()),
                source,
            })?;
        tracing::info!(path = %self.artifact_path(unit.id()), "synthesized stack manifest");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigOverrides, ConfigResolver};
    use crate::env::MapEnv;
    use crate::stack::{EnvironmentDescriptor, compose};
    use rstest::rstest;
    use tempfile::TempDir;

    fn unit(prefix: &str) -> DeploymentUnit {
        let config = ConfigResolver::new(&MapEnv::new())
            .resolve(&ConfigOverrides::with_project_prefix(prefix))
            .expect("configuration should resolve");
        compose(config, EnvironmentDescriptor::new(None, "us-west-2"))
    }

    #[rstest]
    fn writes_manifest_named_after_the_stack() {
        let tmp = TempDir::new().expect("create temporary directory");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf())
            .expect("temporary directory path is not valid UTF-8");
        let mut synth = ManifestSynthesizer::new(root.join("nested").join("out"));

        synth.synthesize(unit("demo")).expect("synthesis should succeed");

        let dir = Dir::open_ambient_dir(synth.out_dir(), ambient_authority())
            .expect("output directory should exist");
        let contents = dir
            .read_to_string("demo-stack.json")
            .expect("manifest should be written");
        let manifest: serde_json::Value =
            serde_json::from_str(&contents).expect("manifest should be JSON");
        assert_eq!(manifest["id"], "demo-stack");
        assert_eq!(manifest["tags"]["Project"], "demo");
    }

    #[rstest]
    fn artifact_path_joins_out_dir_and_id() {
        let synth = ManifestSynthesizer::default();
        assert_eq!(
            synth.artifact_path("demo-stack"),
            Utf8PathBuf::from("cdk.out/demo-stack.json")
        );
    }
}
