//! Reading data files: which formats are accepted, where the surge config
//! and string table live in a data directory, and how a file becomes a
//! typed value.

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use gridsurge_core::config::ConfigError;

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// The data directory does not exist.
    #[error("data directory not found: {dir}")]
    MissingDir { dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// The file parsed but holds an unusable value.
    #[error("invalid value in {file}: {source}")]
    Invalid {
        file: PathBuf,
        #[source]
        source: ConfigError,
    },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Formats and data files
// ===========================================================================

/// Serialization formats a data file may use, keyed by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

impl Format {
    /// Discovery order when several extensions are probed.
    pub const ALL: [Format; 3] = [Format::Ron, Format::Toml, Format::Json];

    pub fn extension(self) -> &'static str {
        match self {
            Format::Ron => "ron",
            Format::Toml => "toml",
            Format::Json => "json",
        }
    }
}

/// Pick the format from a path's extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    let ext = path.extension().and_then(|e| e.to_str());
    Format::ALL
        .into_iter()
        .find(|f| Some(f.extension()) == ext)
        .ok_or_else(|| DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        })
}

/// The files a data directory may hold. Both are optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFile {
    /// `surge.*`: a `SurgeConfig`.
    SurgeConfig,
    /// `strings.*`: a letter string table.
    Strings,
}

impl DataFile {
    pub fn base_name(self) -> &'static str {
        match self {
            DataFile::SurgeConfig => "surge",
            DataFile::Strings => "strings",
        }
    }
}

/// Locate `kind` in `dir` under any supported extension.
///
/// `Ok(None)` when absent. Two extensions for the same file is an error
/// rather than a silent pick.
pub fn find_data_file(dir: &Path, kind: DataFile) -> Result<Option<PathBuf>, DataLoadError> {
    let mut present = Format::ALL
        .into_iter()
        .map(|f| dir.join(format!("{}.{}", kind.base_name(), f.extension())))
        .filter(|path| path.is_file());

    let Some(first) = present.next() else {
        return Ok(None);
    };
    match present.next() {
        Some(second) => Err(DataLoadError::ConflictingFormats {
            a: first,
            b: second,
        }),
        None => Ok(Some(first)),
    }
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Read a file and deserialize it according to its format.
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    deserialize_str(&content, format, path)
}

/// Deserialize already-read content. `origin` is only used in errors.
pub fn deserialize_str<T: DeserializeOwned>(
    content: &str,
    format: Format,
    origin: &Path,
) -> Result<T, DataLoadError> {
    let parse_error = |detail: String| DataLoadError::Parse {
        file: origin.to_path_buf(),
        detail,
    };
    match format {
        Format::Ron => ron::from_str(content).map_err(|e| parse_error(e.to_string())),
        Format::Json => serde_json::from_str(content).map_err(|e| parse_error(e.to_string())),
        Format::Toml => toml::from_str(content).map_err(|e| parse_error(e.to_string())),
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::fs;

    /// Create a temporary directory with a unique name for test isolation.
    pub(crate) fn make_test_dir(suffix: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "gridsurge_data_test_{suffix}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Clean up a test directory.
    pub(crate) fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    // -----------------------------------------------------------------------
    // detect_format
    // -----------------------------------------------------------------------

    #[test]
    fn detect_format_by_extension() {
        assert_eq!(detect_format(Path::new("surge.ron")).unwrap(), Format::Ron);
        assert_eq!(detect_format(Path::new("surge.toml")).unwrap(), Format::Toml);
        assert_eq!(detect_format(Path::new("surge.json")).unwrap(), Format::Json);
    }

    #[test]
    fn detect_format_unsupported() {
        let err = detect_format(Path::new("surge.yaml")).unwrap_err();
        assert!(matches!(err, DataLoadError::UnsupportedFormat { .. }));
        assert!(detect_format(Path::new("surge")).is_err());
    }

    #[test]
    fn extensions_round_trip_through_detection() {
        for format in Format::ALL {
            let path = PathBuf::from(format!("x.{}", format.extension()));
            assert_eq!(detect_format(&path).unwrap(), format);
        }
    }

    // -----------------------------------------------------------------------
    // find_data_file
    // -----------------------------------------------------------------------


    #[test]
    fn find_data_file_single_match() {
        let dir = make_test_dir("find_single");
        fs::write(dir.join("surge.toml"), "").unwrap();

        let found = find_data_file(&dir, DataFile::SurgeConfig).unwrap();
        assert_eq!(found, Some(dir.join("surge.toml")));
        cleanup(&dir);
    }

    #[test]
    fn find_data_file_missing_is_none() {
        let dir = make_test_dir("find_missing");
        assert_eq!(find_data_file(&dir, DataFile::SurgeConfig).unwrap(), None);
        cleanup(&dir);
    }

    #[test]
    fn find_data_file_ignores_other_base_names() {
        let dir = make_test_dir("find_other");
        fs::write(dir.join("strings.json"), "{}").unwrap();

        assert_eq!(find_data_file(&dir, DataFile::SurgeConfig).unwrap(), None);
        assert_eq!(
            find_data_file(&dir, DataFile::Strings).unwrap(),
            Some(dir.join("strings.json"))
        );
        cleanup(&dir);
    }

    #[test]
    fn find_data_file_conflict() {
        let dir = make_test_dir("find_conflict");
        fs::write(dir.join("surge.ron"), "()").unwrap();
        fs::write(dir.join("surge.json"), "{}").unwrap();

        let err = find_data_file(&dir, DataFile::SurgeConfig).unwrap_err();
        assert!(matches!(err, DataLoadError::ConflictingFormats { .. }));
        cleanup(&dir);
    }

    // -----------------------------------------------------------------------
    // deserialize
    // -----------------------------------------------------------------------

    #[test]
    fn deserialize_each_format() {
        let origin = Path::new("inline");
        let ron: BTreeMap<String, u32> = deserialize_str(r#"{ "a": 1 }"#, Format::Ron, origin).unwrap();
        let json: BTreeMap<String, u32> = deserialize_str(r#"{ "a": 1 }"#, Format::Json, origin).unwrap();
        let toml: BTreeMap<String, u32> = deserialize_str("a = 1", Format::Toml, origin).unwrap();
        assert_eq!(ron, json);
        assert_eq!(json, toml);
    }

    #[test]
    fn parse_error_names_file() {
        let err = deserialize_str::<BTreeMap<String, u32>>("{ nope", Format::Json, Path::new("bad.json"))
            .unwrap_err();
        match err {
            DataLoadError::Parse { file, .. } => assert_eq!(file, PathBuf::from("bad.json")),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = deserialize_file::<BTreeMap<String, u32>>(Path::new("/nonexistent/gridsurge/surge.ron"))
            .unwrap_err();
        assert!(matches!(err, DataLoadError::Io(_)));
    }
}
