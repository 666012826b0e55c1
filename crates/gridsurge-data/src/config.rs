//! Loading [`SurgeConfig`] from disk.

use std::path::Path;

use gridsurge_core::config::SurgeConfig;

use crate::loader::{DataLoadError, deserialize_file};

/// Load a surge config from a `.ron`, `.toml` or `.json` file.
///
/// Missing fields take their defaults. The result is validated before it
/// is returned.
pub fn load_surge_config(path: &Path) -> Result<SurgeConfig, DataLoadError> {
    let config: SurgeConfig = deserialize_file(path)?;
    config.validate().map_err(|source| DataLoadError::Invalid {
        file: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(target: "gridsurge::data", file = %path.display(), "loaded surge config");
    Ok(config)
}
