//! Configuration file tier.
//!
//! The file is located in this order: the path passed by the caller, the path
//! named by [`CONFIG_PATH_VAR`], then [`CONFIG_FILE_NAME`] inside the search
//! directory. Paths named explicitly must exist; the discovered file is
//! optional.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use figment::Profile;
use figment::Provider;
use figment::providers::{Format, Toml};

use crate::env::EnvLookup;
use crate::error::{ConfigResult, ConfigurationError};

use super::layer::{ConfigLayer, LayerProvenance};

/// File name looked up in the search directory.
pub const CONFIG_FILE_NAME: &str = "mcp-stack.toml";

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_VAR: &str = "MCP_CONFIG_PATH";

/// Return the parent directory of `path`, falling back to `"."` when the path
/// has no parent or the parent is empty.
fn parent_or_dot(path: &Utf8Path) -> &Utf8Path {
    path.parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."))
}

/// Open the parent directory of `path` via `cap-std` and extract the file name.
fn open_parent_dir_and_name(path: &Utf8Path) -> std::io::Result<(Dir, String)> {
    let parent = parent_or_dot(path);
    let file_name = path.file_name().ok_or_else(|| {
        std::io::Error::other("cannot determine file name for configuration file path")
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name.to_owned()))
}

/// Decide which configuration file, if any, feeds the file tier.
pub(super) fn locate(
    explicit: Option<&Utf8Path>,
    env: &dyn EnvLookup,
    search_dir: Option<&Utf8Path>,
) -> Option<Utf8PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_owned());
    }
    if let Some(path) = env.get_non_blank(CONFIG_PATH_VAR) {
        return Some(Utf8PathBuf::from(path));
    }
    let dir = search_dir?;
    let present = Dir::open_ambient_dir(dir, ambient_authority())
        .map(|handle| handle.is_file(CONFIG_FILE_NAME))
        .unwrap_or_else(|err| {
            tracing::debug!(%dir, error = %err, "search directory is not readable");
            false
        });
    present.then(|| dir.join(CONFIG_FILE_NAME))
}

/// Read and parse the TOML file at `path` into a file layer.
pub(super) fn load_file_layer(path: &Utf8Path) -> ConfigResult<ConfigLayer> {
    let (dir, name) =
        open_parent_dir_and_name(path).map_err(|err| ConfigurationError::file(path, err))?;
    let contents = dir
        .read_to_string(&name)
        .map_err(|err| ConfigurationError::file(path, err))?;
    let mut data = Toml::string(&contents)
        .data()
        .map_err(|err| ConfigurationError::file(path, err.to_string()))?;
    let values = data.remove(&Profile::Default).unwrap_or_default();
    tracing::debug!(%path, keys = values.len(), "loaded configuration file");
    Ok(ConfigLayer::new(LayerProvenance::File, values).with_path(path))
}
