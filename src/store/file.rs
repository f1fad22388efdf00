//! File-backed preference storage — one JSON object file per bucket.
//!
//! Buckets live under the prefs directory as `<bucket>.json`, each a
//! flat string-to-string object. Writes go through a tempfile in the
//! same directory followed by an atomic rename, so a crash mid-write
//! leaves the previous payload intact. There is no schema version and
//! no migration path.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

use super::{PreferenceStore, StoreError};
use crate::config;

pub struct FilePreferences {
    root: PathBuf,
}

impl FilePreferences {
    /// Preferences rooted at an explicit directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Preferences under the default app data directory
    /// (`~/Remedia/prefs`).
    pub fn open_default() -> Self {
        Self::new(config::prefs_dir())
    }

    fn bucket_path(&self, bucket: &str) -> PathBuf {
        self.root.join(format!("{bucket}.json"))
    }

    /// Reads a bucket file into a key map. A missing file is an empty
    /// bucket; a corrupt one is logged and treated as empty.
    fn read_bucket(&self, bucket: &str) -> Result<BTreeMap<String, String>, StoreError> {
        let path = self.bucket_path(bucket);
        let data = match std::fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&data) {
            Ok(map) => Ok(map),
            Err(e) => {
                tracing::warn!(bucket, error = %e, "corrupt preference bucket, treating as empty");
                Ok(BTreeMap::new())
            }
        }
    }

    fn write_bucket(&self, bucket: &str, map: &BTreeMap<String, String>) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.root)?;
        let payload = serde_json::to_string_pretty(map)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.root)?;
        tmp.write_all(payload.as_bytes())?;
        tmp.persist(self.bucket_path(bucket))
            .map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, bucket: &str, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_bucket(bucket)?.remove(key))
    }

    fn put(&self, bucket: &str, key: &str, value: &str) -> Result<(), StoreError> {
        let mut map = self.read_bucket(bucket)?;
        map.insert(key.into(), value.into());
        self.write_bucket(bucket, &map)
    }
}
