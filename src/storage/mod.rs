// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Durable client-side key-value storage.
//!
//! Reads and writes are synchronous. Values are JSON strings.

pub mod file;
pub mod memory;
pub mod profile_cache;
pub mod session;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use profile_cache::{ProfileCache, PROFILE_CACHE_TTL_MS};
pub use session::{Session, SessionStore};

use std::sync::Arc;

/// Storage key names as constants.
pub mod keys {
    pub const AUTH_TOKEN: &str = "auth_token";
    pub const AUTH_USER: &str = "auth_user";
    pub const PROFILE_CACHE: &str = "user_profile_cache";
}

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// String key-value store shared by the whole process.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Shared store handle.
pub type SharedStore = Arc<dyn KeyValueStore>;
