use std::{fs, io::{self, Write}, path::{Path, PathBuf}};

use log::debug;
use tempfile::NamedTempFile;

use crate::backend::interface::{KeyValueStore, BackendError, Result};

/// Key-value store keeping each key as `<dir>/<key>.json`.
///
/// Writes go to a temporary file in the same directory which is then
/// renamed over the target, so readers see either the old or the new
/// blob, never a partial one.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf
}

impl JsonStore {
    const EXTENSION: &'static str = "json";

    pub fn new(dir: impl AsRef<Path>) -> JsonStore {
        JsonStore { dir: dir.as_ref().to_path_buf() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        Self::validate_key(key)?;
        return Ok(self.dir.join(format!("{}.{}", key, Self::EXTENSION)));
    }

    fn validate_key(key: &str) -> Result<()> {
        let valid_chars = key.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-');
        if key.is_empty() || key.starts_with('.') || !valid_chars {
            return Err(BackendError::InvalidKey(key.to_owned()));
        }
        return Ok(());
    }

    fn io_error(key: &str) -> impl FnOnce(io::Error) -> BackendError + '_ {
        move |source| BackendError::Io { key: key.to_owned(), source }
    }
}

impl KeyValueStore for JsonStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Self::io_error(key)(err))
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(Self::io_error(key))?;

        let mut temp = NamedTempFile::new_in(&self.dir).map_err(Self::io_error(key))?;
        temp.write_all(value.as_bytes()).map_err(Self::io_error(key))?;
        temp.as_file().sync_all().map_err(Self::io_error(key))?;
        temp.persist(&path).map_err(|err| Self::io_error(key)(err.error))?;

        debug!("wrote {} bytes to {}", value.len(), path.display());
        return Ok(());
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Self::io_error(key)(err))
        }
    }
}


#[cfg(test)]
mod tests {
    use crate::backend::{JsonStore, KeyValueStore, BackendError};

    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn dir() -> TempDir {
        tempfile::tempdir().unwrap()
    }

    #[rstest]
    fn missing_key_is_absent(dir: TempDir) {
        let store = JsonStore::new(dir.path());
        assert_eq!(store.get("balance-storage").unwrap(), None);
    }

    #[rstest]
    fn set_then_get(dir: TempDir) {
        let store = JsonStore::new(dir.path());
        store.set("balance-storage", "{\"a\":1}").unwrap();

        assert_eq!(store.get("balance-storage").unwrap().as_deref(), Some("{\"a\":1}"));
        assert!(dir.path().join("balance-storage.json").exists());
    }

    #[rstest]
    fn set_replaces_previous_value(dir: TempDir) {
        let store = JsonStore::new(dir.path());
        store.set("k", "first, and rather long").unwrap();
        store.set("k", "second").unwrap();

        assert_eq!(store.get("k").unwrap().as_deref(), Some("second"));
        // only the target file is left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[rstest]
    fn creates_missing_directory(dir: TempDir) {
        let store = JsonStore::new(dir.path().join("nested").join("data"));
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[rstest]
    fn remove_is_idempotent(dir: TempDir) {
        let store = JsonStore::new(dir.path());
        store.set("k", "v").unwrap();

        store.remove("k").unwrap();
        store.remove("k").unwrap();

        assert_eq!(store.get("k").unwrap(), None);
    }

    #[rstest]
    #[case("")]
    #[case("../escape")]
    #[case(".hidden")]
    #[case("with space")]
    fn rejects_bad_keys(dir: TempDir, #[case] key: &str) {
        let store = JsonStore::new(dir.path());
        assert!(matches!(store.get(key), Err(BackendError::InvalidKey(..))));
        assert!(matches!(store.set(key, "v"), Err(BackendError::InvalidKey(..))));
    }
}
