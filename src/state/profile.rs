// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile state for `user`-role sessions.
//!
//! Reads go through the profile cache unless forced. Every fetch carries a
//! generation number; a response that arrives after a newer fetch, an
//! `update`, a `clear`, or an identity change is discarded.

use crate::models::{Role, UserProfile};
use crate::services::ProfileService;
use crate::state::auth::AuthSnapshot;
use crate::storage::ProfileCache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Immutable view of the profile state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileSnapshot {
    pub profile: Option<UserProfile>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Identity the profile state was last synced for.
type Identity = Option<(String, Role)>;

pub struct ProfileContext {
    service: ProfileService,
    cache: ProfileCache,
    auth: watch::Receiver<AuthSnapshot>,
    state: watch::Sender<ProfileSnapshot>,
    generation: AtomicU64,
    synced_identity: Mutex<Identity>,
}

impl ProfileContext {
    pub fn new(
        service: ProfileService,
        cache: ProfileCache,
        auth: watch::Receiver<AuthSnapshot>,
    ) -> Self {
        let (state, _) = watch::channel(ProfileSnapshot::default());
        Self {
            service,
            cache,
            auth,
            state,
            generation: AtomicU64::new(0),
            synced_identity: Mutex::new(None),
        }
    }

    pub fn snapshot(&self) -> ProfileSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ProfileSnapshot> {
        self.state.subscribe()
    }

    /// Session user id, if the session is a `user`-role one.
    fn owner(&self) -> Option<String> {
        let auth = self.auth.borrow();
        auth.user
            .as_ref()
            .filter(|u| u.role == Role::User)
            .map(|u| u.id.clone())
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Load the profile, from cache unless `force`.
    ///
    /// Returns `None` outside a `user` session, on failure (see
    /// [`ProfileSnapshot::error`]), or when the result was superseded.
    pub async fn fetch(&self, force: bool) -> Option<UserProfile> {
        let owner = self.owner()?;

        if !force {
            if let Some(profile) = self.cache.load(&owner) {
                self.state.send_modify(|s| s.profile = Some(profile.clone()));
                return Some(profile);
            }
        }

        let generation = self.next_generation();
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });

        let result = self.service.get_profile().await;

        if !self.is_current(generation) {
            tracing::debug!(generation, "Discarding superseded profile response");
            return None;
        }

        match result {
            Ok(profile) => {
                if let Err(e) = self.cache.save(&owner, &profile) {
                    tracing::warn!(error = %e, "Failed to cache profile");
                }
                self.state.send_modify(|s| {
                    s.profile = Some(profile.clone());
                    s.is_loading = false;
                });
                Some(profile)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Profile fetch failed");
                self.state.send_modify(|s| {
                    s.error = Some(e.to_string());
                    s.is_loading = false;
                });
                None
            }
        }
    }

    /// Bypass the cache.
    pub async fn refresh(&self) -> Option<UserProfile> {
        self.fetch(true).await
    }

    /// Adopt a profile produced by a local mutation (edit, avatar upload).
    /// No-op outside a `user` session.
    pub fn update(&self, profile: UserProfile) {
        let Some(owner) = self.owner() else {
            tracing::debug!("Ignoring profile update outside a user session");
            return;
        };
        self.next_generation();
        if let Err(e) = self.cache.save(&owner, &profile) {
            tracing::warn!(error = %e, "Failed to cache profile");
        }
        self.state.send_modify(|s| {
            s.profile = Some(profile);
            s.is_loading = false;
            s.error = None;
        });
    }

    /// Purge the cache and reset state. The next sync loads again even
    /// for the same identity.
    pub fn clear(&self) {
        self.next_generation();
        *self.synced() = None;
        self.cache.clear();
        self.reset();
    }

    fn synced(&self) -> MutexGuard<'_, Identity> {
        self.synced_identity
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn reset(&self) {
        self.state.send_replace(ProfileSnapshot::default());
    }

    /// Re-run the initial load if the session identity changed.
    ///
    /// `user` role: fetch (cache first). Anything else: reset without a
    /// network call.
    pub async fn sync_with_auth(&self) {
        let identity: Identity = {
            let auth = self.auth.borrow();
            auth.user.as_ref().map(|u| (u.id.clone(), u.role))
        };

        {
            let mut synced = self.synced();
            if *synced == identity {
                return;
            }
            *synced = identity.clone();
        }

        match identity {
            Some((user_id, Role::User)) => {
                tracing::debug!(%user_id, "Session identity changed, loading profile");
                // In-flight fetches belong to the previous identity.
                self.next_generation();
                self.reset();
                self.fetch(false).await;
            }
            _ => {
                self.next_generation();
                self.reset();
            }
        }
    }

    /// Keep the profile in step with the auth state until the auth
    /// publisher goes away.
    pub fn watch_auth(self: &Arc<Self>) -> JoinHandle<()> {
        let ctx = Arc::clone(self);
        let mut auth = self.auth.clone();
        tokio::spawn(async move {
            loop {
                auth.borrow_and_update();
                ctx.sync_with_auth().await;
                if auth.changed().await.is_err() {
                    break;
                }
            }
        })
    }
}
