//! JSON file implementation of the progress store.
//!
//! Each key maps to `<root>/<key>.json`. Writes land in a sibling temp file
//! first and are renamed into place.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
};

use serde_json::Value;

use crate::{Result, error::Error, ports::ProgressStore};

/// File-backed store rooted at a directory.
///
/// # Examples
///
/// ```no_run
/// use pillar_agent::adapters::JsonFileStore;
/// use pillar_agent::ports::ProgressStore;
/// use serde_json::json;
///
/// let store = JsonFileStore::new(".pillar-agent");
/// store.save("qagent_progress", &json!({"episodeCount": 0}))?;
/// let restored = store.load("qagent_progress")?;
/// # Ok::<(), pillar_agent::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `root`. The directory is created on first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// File that holds `key`. Path separators in keys are replaced.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{file_name}.json"))
    }
}

/// Write `value` as JSON to `path`, flushing before returning.
fn write_json(path: &Path, key: &str, value: &Value) -> Result<()> {
    let file = File::create(path).map_err(|source| Error::Io {
        operation: format!("create file {path:?}"),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, value).map_err(|e| Error::SerializationContext {
        operation: format!("serialize '{key}' to JSON"),
        message: e.to_string(),
    })?;
    writer.flush().map_err(|source| Error::Io {
        operation: format!("flush file {path:?}"),
        source,
    })
}

impl ProgressStore for JsonFileStore {
    fn save(&self, key: &str, value: &Value) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|source| Error::Io {
            operation: format!("create store directory {:?}", self.root),
            source,
        })?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");

        let written = write_json(&tmp, key, value).and_then(|()| {
            fs::rename(&tmp, &path).map_err(|source| Error::Io {
                operation: format!("move {tmp:?} to {path:?}"),
                source,
            })
        });
        if written.is_err() {
            // the write error is the one worth reporting
            let _ = fs::remove_file(&tmp);
        }
        written
    }

    fn load(&self, key: &str) -> Result<Option<Value>> {
        let path = self.path_for(key);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(Error::Io {
                    operation: format!("open file {path:?}"),
                    source,
                });
            }
        };

        serde_json::from_reader(BufReader::new(file))
            .map(Some)
            .map_err(|e| Error::SerializationContext {
                operation: format!("deserialize '{key}' from {path:?}"),
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_json_file_roundtrip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = JsonFileStore::new(temp_dir.path().join("nested"));

        let payload = json!({"qTable": [["0,0:none", [["up", 1.5]]]], "episodeCount": 2});
        store.save("qagent_progress", &payload).expect("Failed to save");

        assert!(store.path_for("qagent_progress").exists());
        let loaded = store.load("qagent_progress").expect("Failed to load");
        assert_eq!(loaded, Some(payload));
    }

    #[test]
    fn test_missing_key_is_none() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = JsonFileStore::new(temp_dir.path());
        assert_eq!(store.load("absent").unwrap(), None);
    }

    #[test]
    fn test_truncated_file_is_an_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = JsonFileStore::new(temp_dir.path());
        fs::write(store.path_for("broken"), "{\"qTable\": [[").unwrap();
        assert!(store.load("broken").is_err());
    }

    #[test]
    fn test_keys_cannot_escape_root() {
        let store = JsonFileStore::new("/tmp/store");
        let path = store.path_for("../etc/passwd");
        assert_eq!(path, PathBuf::from("/tmp/store/.._etc_passwd.json"));
    }

    #[test]
    fn test_save_into_unwritable_location_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let blocker = temp_dir.path().join("file");
        fs::write(&blocker, "not a directory").unwrap();
        let store = JsonFileStore::new(blocker.join("sub"));
        assert!(store.save("k", &json!(1)).is_err());
    }

    #[test]
    fn test_failed_save_removes_temp_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = JsonFileStore::new(temp_dir.path());
        let target = store.path_for("progress");
        // A non-empty directory in the way makes the final rename fail.
        fs::create_dir_all(target.join("occupied")).unwrap();

        assert!(store.save("progress", &json!({"episodeCount": 1})).is_err());
        assert!(!target.with_extension("json.tmp").exists());
        assert!(target.is_dir());
    }
}
