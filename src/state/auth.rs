// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication state shared across the application.

use crate::error::Result;
use crate::models::{User, UserPatch};
use crate::services::{AuthService, Credentials, SessionEvent};
use tokio::sync::watch;

/// Immutable view of the authentication state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSnapshot {
    pub user: Option<User>,
    pub is_loading: bool,
}

impl AuthSnapshot {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

impl Default for AuthSnapshot {
    /// Before [`AuthContext::init`] runs.
    fn default() -> Self {
        Self {
            user: None,
            is_loading: true,
        }
    }
}

/// Holds the current user and publishes every change to subscribers.
pub struct AuthContext {
    service: AuthService,
    state: watch::Sender<AuthSnapshot>,
}

impl AuthContext {
    pub fn new(service: AuthService) -> Self {
        let (state, _) = watch::channel(AuthSnapshot::default());
        Self { service, state }
    }

    /// Restore the persisted session. Loading ends whether or not one exists.
    pub fn init(&self) -> AuthSnapshot {
        let user = self.service.current_user();
        if let Some(user) = &user {
            tracing::info!(user_id = %user.id, role = %user.role, "Session restored");
        }
        self.publish(AuthSnapshot {
            user,
            is_loading: false,
        })
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.state.subscribe()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn service(&self) -> &AuthService {
        &self.service
    }

    /// Sign in. Errors propagate unchanged; loading is always reset.
    pub async fn login(&self, credentials: &Credentials) -> Result<User> {
        self.state.send_modify(|s| s.is_loading = true);

        let result = self.service.login(credentials).await;

        self.state.send_modify(|s| {
            if let Ok(user) = &result {
                s.user = Some(user.clone());
            }
            s.is_loading = false;
        });
        result
    }

    /// Sign out. The user is cleared even if the server call fails.
    pub async fn logout(&self) {
        self.service.logout().await;
        self.state.send_modify(|s| s.user = None);
    }

    /// Merge a patch into the current user and re-persist it.
    /// Returns the new user, or `None` (no-op) when signed out.
    pub fn update_user(&self, patch: &UserPatch) -> Option<User> {
        let current = self.current_user()?;
        let updated = current.apply(patch);
        if let Err(e) = self.service.api().sessions().replace_user(&updated) {
            tracing::warn!(error = %e, "Failed to persist updated user");
        }
        self.state.send_modify(|s| s.user = Some(updated.clone()));
        Some(updated)
    }

    /// React to a session event from the API client.
    ///
    /// An expiry that arrives after a newer session was stored is stale
    /// and ignored. Returns whether the user was cleared.
    pub fn handle_session_event(&self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::Expired => {
                if self.service.current_user().is_some() {
                    tracing::debug!("Stale expiry event, session already replaced");
                    return false;
                }
                tracing::info!("Session expired, clearing user");
                self.state.send_modify(|s| {
                    s.user = None;
                    s.is_loading = false;
                });
                true
            }
        }
    }

    fn publish(&self, snapshot: AuthSnapshot) -> AuthSnapshot {
        self.state.send_replace(snapshot.clone());
        snapshot
    }
}
