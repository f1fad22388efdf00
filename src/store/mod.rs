pub mod checkins;
pub mod file;
pub mod medicines;
pub mod memory;
pub mod settings;

pub use file::FilePreferences;
pub use memory::MemoryPreferences;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Validation failed: {0}")]
    Invalid(String),
}

/// Key-value preference storage, the persistence seam of the crate.
///
/// Mirrors the shape of the original preference files: string values
/// keyed by (bucket, key). Both collections are stored as one JSON
/// array string under a well-known key in their bucket; reminder
/// settings use individual keys. Implementations must tolerate
/// concurrent callers but need no stronger guarantee: collections are
/// read-modify-written in full, and a lost update between two
/// simultaneous writers is accepted for this single-user crate.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, bucket: &str, key: &str) -> Result<Option<String>, StoreError>;
    fn put(&self, bucket: &str, key: &str, value: &str) -> Result<(), StoreError>;
}
