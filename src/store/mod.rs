pub mod keys;
pub mod migrate;
pub mod operations;
pub mod trees;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::Db;
use thiserror::Error;

/// Local key-value storage for everything the player persists.
#[derive(Debug)]
pub struct Store {
    db: Db,
    pub profile: sled::Tree,
    pub attempt_stats: sled::Tree,
    pub preferences: sled::Tree,
    pub meta: sled::Tree,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("migration error at version {version}: {message}")]
    Migration { version: u32, message: String },
}

impl StoreError {
    /// Stored bytes exist but are not the expected JSON shape.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Serialization(_))
    }
}

impl Store {
    pub fn open(sled_path: &str) -> Result<Self, StoreError> {
        let db = sled::open(sled_path)?;
        let profile = db.open_tree(trees::PROFILE)?;
        let attempt_stats = db.open_tree(trees::ATTEMPT_STATS)?;
        let preferences = db.open_tree(trees::PREFERENCES)?;
        let meta = db.open_tree(trees::META)?;

        Ok(Self {
            db,
            profile,
            attempt_stats,
            preferences,
            meta,
        })
    }

    pub fn run_migrations(&self) -> Result<(), StoreError> {
        migrate::run(self)
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }

    pub(crate) fn serialize<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
        Ok(serde_json::to_vec(value)?)
    }

    pub(crate) fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub(crate) fn read<T: DeserializeOwned>(
        tree: &sled::Tree,
        key: &str,
    ) -> Result<Option<T>, StoreError> {
        match tree.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    pub(crate) fn write<T: Serialize>(
        tree: &sled::Tree,
        key: &str,
        value: &T,
    ) -> Result<(), StoreError> {
        tree.insert(key.as_bytes(), Self::serialize(value)?)?;
        Ok(())
    }
}
