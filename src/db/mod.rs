//! Storage layer (key-value substrate).

pub mod storage;

pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};

/// Storage keys as constants.
pub mod keys {
    /// The whole workout collection, serialized as one blob.
    pub const WORKOUTS: &str = "workouts";
    /// Copy of a collection blob that could not be read.
    pub const WORKOUTS_UNREADABLE: &str = "workouts.unreadable";
}
