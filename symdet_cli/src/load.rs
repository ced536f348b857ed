use std::fs;
use std::path::{Path, PathBuf};

use symdet_common::{Netlist, NetlistError, RawNetlist};
use thiserror::Error;
use tracing::debug;

/// Failure to turn a file into a [`Netlist`].
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid JSON description.
    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The description was rejected by the netlist builder.
    #[error("malformed netlist {}: {source}", path.display())]
    Netlist {
        path: PathBuf,
        #[source]
        source: NetlistError,
    },
}

/// Reads a JSON netlist description from `path` and builds it.
pub fn load_netlist(path: &Path) -> Result<Netlist, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let raw: RawNetlist = serde_json::from_str(&text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        "{}: {} nets, {} devices",
        path.display(),
        raw.nets.len(),
        raw.devices.len()
    );
    Netlist::build(&raw).map_err(|source| LoadError::Netlist {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_loads_valid_description() {
        let file = write_temp(
            r#"{"nets": [{"name": "A", "id": 0}],
                "devices": [{"name": "M1", "kind": "NMOS", "nets": [0, 0, 0, 0]}]}"#,
        );
        let netlist = load_netlist(file.path()).unwrap();
        assert_eq!(netlist.devices().len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let err = load_netlist(Path::new("/nonexistent/netlist.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn test_bad_json() {
        let file = write_temp("{ not json");
        assert!(matches!(
            load_netlist(file.path()).unwrap_err(),
            LoadError::Json { .. }
        ));
    }

    #[test]
    fn test_malformed_netlist() {
        let file = write_temp(
            r#"{"nets": [{"name": "A", "id": 0}],
                "devices": [{"name": "M1", "kind": "PMOS", "nets": [0, 0]}]}"#,
        );
        let err = load_netlist(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Netlist { .. }));
        assert!(err.to_string().contains("expected at least 4"));
    }
}
