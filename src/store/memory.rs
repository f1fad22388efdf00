//! In-memory preference storage for tests and ephemeral use.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{PreferenceStore, StoreError};

#[derive(Default)]
pub struct MemoryPreferences {
    buckets: Mutex<HashMap<String, HashMap<String, String>>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, bucket: &str, key: &str) -> Result<Option<String>, StoreError> {
        let buckets = self.buckets.lock().expect("preference lock");
        Ok(buckets.get(bucket).and_then(|b| b.get(key)).cloned())
    }

    fn put(&self, bucket: &str, key: &str, value: &str) -> Result<(), StoreError> {
        let mut buckets = self.buckets.lock().expect("preference lock");
        buckets
            .entry(bucket.into())
            .or_default()
            .insert(key.into(), value.into());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_returns_none() {
        let prefs = MemoryPreferences::new();
        assert!(prefs.get("b", "k").unwrap().is_none());
    }

    #[test]
    fn put_then_get_round_trips() {
        let prefs = MemoryPreferences::new();
        prefs.put("b", "k", "v").unwrap();
        assert_eq!(prefs.get("b", "k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn same_key_in_different_buckets_is_distinct() {
        let prefs = MemoryPreferences::new();
        prefs.put("a", "k", "1").unwrap();
        prefs.put("b", "k", "2").unwrap();
        assert_eq!(prefs.get("a", "k").unwrap().as_deref(), Some("1"));
        assert_eq!(prefs.get("b", "k").unwrap().as_deref(), Some("2"));
    }
}
