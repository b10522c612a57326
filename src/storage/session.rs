// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persisted session: bearer token plus the signed-in user.

use super::{keys, SharedStore, StorageError};
use crate::models::User;

/// Token and user as stored together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Reads and writes the session under two fixed keys.
#[derive(Clone)]
pub struct SessionStore {
    store: SharedStore,
}

impl SessionStore {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Persist token and user.
    pub fn set(&self, token: &str, user: &User) -> Result<(), StorageError> {
        let user_json = serde_json::to_string(user)?;
        self.store.set(keys::AUTH_TOKEN, token.to_string())?;
        self.store.set(keys::AUTH_USER, user_json)
    }

    /// Read the session.
    ///
    /// Returns `None` unless both halves are present and the user record
    /// parses. A corrupt or orphaned half is purged.
    pub fn get(&self) -> Option<Session> {
        let token = self.store.get(keys::AUTH_TOKEN);
        let user_json = self.store.get(keys::AUTH_USER);

        match (token, user_json) {
            (None, None) => None,
            (Some(token), Some(user_json)) => match serde_json::from_str::<User>(&user_json) {
                Ok(user) if !token.is_empty() => Some(Session { token, user }),
                Ok(_) => {
                    tracing::warn!("Stored token empty, clearing session");
                    self.clear();
                    None
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Stored user record corrupt, clearing session");
                    self.clear();
                    None
                }
            },
            _ => {
                tracing::warn!("Incomplete session in storage, clearing");
                self.clear();
                None
            }
        }
    }

    /// Current bearer token, if a valid session exists.
    pub fn token(&self) -> Option<String> {
        self.get().map(|s| s.token)
    }

    pub fn current_user(&self) -> Option<User> {
        self.get().map(|s| s.user)
    }

    /// Re-persist the user record, keeping the token. No-op without a session.
    pub fn replace_user(&self, user: &User) -> Result<(), StorageError> {
        if self.store.get(keys::AUTH_TOKEN).is_none() {
            return Ok(());
        }
        self.store
            .set(keys::AUTH_USER, serde_json::to_string(user)?)
    }

    /// Remove both keys. Never fails; storage errors are logged.
    pub fn clear(&self) {
        for key in [keys::AUTH_TOKEN, keys::AUTH_USER] {
            if let Err(e) = self.store.remove(key) {
                tracing::warn!(key, error = %e, "Failed to clear session key");
            }
        }
    }
}
