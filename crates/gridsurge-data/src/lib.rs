//! Gridsurge Data -- load surge tuning and letter text from RON, TOML or
//! JSON files.
//!
//! A data directory may hold:
//!
//! - `surge.{ron,toml,json}` -- a [`SurgeConfig`]; defaults when absent.
//! - `strings.{ron,toml,json}` -- a [`StringTable`] of letter templates.
//!
//! Only one format per base name is allowed.

pub mod config;
pub mod loader;
pub mod strings;

use std::path::Path;

use gridsurge_core::config::SurgeConfig;
use gridsurge_core::incident::ShortCircuitIncident;

pub use config::load_surge_config;
pub use loader::{DataFile, DataLoadError, Format};
pub use strings::{Layered, StringTable, load_string_table};

/// Everything loaded from a data directory.
#[derive(Debug, Clone, Default)]
pub struct IncidentData {
    pub config: SurgeConfig,
    pub strings: Option<StringTable>,
}

impl IncidentData {
    /// An incident tuned by the loaded config.
    pub fn incident(&self) -> ShortCircuitIncident {
        ShortCircuitIncident::new(self.config.clone())
    }
}

/// Load `surge.*` and `strings.*` from `dir`.
pub fn load_incident_data(dir: &Path) -> Result<IncidentData, DataLoadError> {
    if !dir.is_dir() {
        return Err(DataLoadError::MissingDir {
            dir: dir.to_path_buf(),
        });
    }

    let config = match loader::find_data_file(dir, DataFile::SurgeConfig)? {
        Some(path) => load_surge_config(&path)?,
        None => SurgeConfig::default(),
    };
    let strings = loader::find_data_file(dir, DataFile::Strings)?
        .map(|path| load_string_table(&path))
        .transpose()?;

    tracing::info!(
        target: "gridsurge::data",
        dir = %dir.display(),
        has_strings = strings.is_some(),
        "loaded incident data"
    );
    Ok(IncidentData { config, strings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::tests::{cleanup, make_test_dir};
    use std::fs;

    #[test]
    fn empty_dir_gives_defaults() {
        let dir = make_test_dir("data_empty");
        let data = load_incident_data(&dir).unwrap();
        assert_eq!(data.config, SurgeConfig::default());
        assert!(data.strings.is_none());
        cleanup(&dir);
    }

    #[test]
    fn missing_dir_is_error() {
        let err = load_incident_data(Path::new("/nonexistent/gridsurge/data")).unwrap_err();
        assert!(matches!(err, DataLoadError::MissingDir { .. }));
    }

    #[test]
    fn loads_both_files() {
        let dir = make_test_dir("data_both");
        fs::write(dir.join("surge.ron"), "(min_stored_energy: 10.0)").unwrap();
        fs::write(dir.join("strings.toml"), "\"shortcircuit.letter_label\" = \"Zap\"\n").unwrap();

        let data = load_incident_data(&dir).unwrap();
        assert_eq!(data.config.min_stored_energy, 10.0);
        assert_eq!(data.strings.as_ref().unwrap().get("shortcircuit.letter_label"), Some("Zap"));
        assert_eq!(data.incident().config.min_stored_energy, 10.0);
        cleanup(&dir);
    }

    #[test]
    fn conflicting_config_files() {
        let dir = make_test_dir("data_conflict");
        fs::write(dir.join("surge.ron"), "()").unwrap();
        fs::write(dir.join("surge.toml"), "").unwrap();

        assert!(matches!(
            load_incident_data(&dir).unwrap_err(),
            DataLoadError::ConflictingFormats { .. }
        ));
        cleanup(&dir);
    }
}
