// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Current screen location.

use crate::routes::{GuardDecision, LOGIN_PATH};
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    /// Screen the user originally asked for, kept for post-login return.
    pub from: Option<String>,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            from: None,
        }
    }
}

pub struct Navigator {
    location: watch::Sender<Location>,
}

impl Navigator {
    pub fn new(initial: &str) -> Self {
        let (location, _) = watch::channel(Location::new(initial));
        Self { location }
    }

    pub fn current(&self) -> Location {
        self.location.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Location> {
        self.location.subscribe()
    }

    /// Move according to a guard decision for `requested`.
    /// A loading decision leaves the location unchanged.
    pub fn apply(&self, requested: &str, decision: &GuardDecision) {
        match decision {
            GuardDecision::Loading => {}
            GuardDecision::Render => {
                self.location.send_replace(Location::new(requested));
            }
            GuardDecision::Redirect(redirect) => {
                self.location.send_replace(Location {
                    path: redirect.to.clone(),
                    from: redirect.from.clone(),
                });
            }
        }
    }

    /// Unconditional move to the login screen.
    pub fn to_login(&self) {
        self.location.send_replace(Location::new(LOGIN_PATH));
    }

    /// Where to go after a successful login: the remembered screen, if any.
    pub fn take_return_path(&self) -> Option<String> {
        let mut from = None;
        self.location.send_modify(|loc| from = loc.from.take());
        from
    }
}
