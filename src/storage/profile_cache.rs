// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Single-slot profile cache with a fixed TTL.
//!
//! The slot records which session user it belongs to; another user's entry
//! is a miss. Eviction is lazy: stale, foreign, or unparseable entries are
//! purged when read.

use super::{keys, SharedStore, StorageError};
use crate::models::{CachedProfile, UserProfile};
use crate::time_utils::SharedClock;

/// Cache lifetime (5 minutes).
pub const PROFILE_CACHE_TTL_MS: i64 = 5 * 60 * 1000;

#[derive(Clone)]
pub struct ProfileCache {
    store: SharedStore,
    clock: SharedClock,
}

impl ProfileCache {
    pub fn new(store: SharedStore, clock: SharedClock) -> Self {
        Self { store, clock }
    }

    /// Cached profile for `owner`, if fresh.
    pub fn load(&self, owner: &str) -> Option<UserProfile> {
        let raw = self.store.get(keys::PROFILE_CACHE)?;

        let cached: CachedProfile = match serde_json::from_str(&raw) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(error = %e, "Profile cache entry corrupt, purging");
                self.clear();
                return None;
            }
        };

        if cached.owner != owner {
            tracing::debug!(owner, cached_owner = %cached.owner, "Profile cache belongs to another user, purging");
            self.clear();
            return None;
        }

        let age = self.clock.now_millis() - cached.timestamp;
        if age > PROFILE_CACHE_TTL_MS {
            tracing::debug!(owner, age_ms = age, "Profile cache expired, purging");
            self.clear();
            return None;
        }

        tracing::debug!(owner, age_ms = age, "Profile cache hit");
        Some(cached.data)
    }

    /// Overwrite the slot with a fresh entry.
    pub fn save(&self, owner: &str, profile: &UserProfile) -> Result<(), StorageError> {
        let entry = CachedProfile {
            owner: owner.to_string(),
            data: profile.clone(),
            timestamp: self.clock.now_millis(),
        };
        self.store
            .set(keys::PROFILE_CACHE, serde_json::to_string(&entry)?)
    }

    pub fn clear(&self) {
        if let Err(e) = self.store.remove(keys::PROFILE_CACHE) {
            tracing::warn!(error = %e, "Failed to clear profile cache");
        }
    }
}
