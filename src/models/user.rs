// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Signed-in user identity and role.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Authorization role. Fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Landing screen for the role.
    pub fn default_route(self) -> &'static str {
        match self {
            Role::Admin => "/dashboard",
            Role::User => "/ho-so-ca-nhan",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User record held by the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Partial update to a [`User`]. Identity and role cannot be patched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub email: Option<String>,
    pub name: Option<String>,
    /// `Some(None)` clears the avatar.
    pub avatar: Option<Option<String>>,
}

impl UserPatch {
    pub fn avatar(url: impl Into<String>) -> Self {
        Self {
            avatar: Some(Some(url.into())),
            ..Self::default()
        }
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.name.is_none() && self.avatar.is_none()
    }
}

impl User {
    /// Apply a patch, producing a new user.
    pub fn apply(&self, patch: &UserPatch) -> User {
        User {
            id: self.id.clone(),
            email: patch.email.clone().unwrap_or_else(|| self.email.clone()),
            name: patch.name.clone().unwrap_or_else(|| self.name.clone()),
            role: self.role,
            avatar: match &patch.avatar {
                Some(avatar) => avatar.clone(),
                None => self.avatar.clone(),
            },
        }
    }

    /// Name for display; falls back to the email's local part.
    pub fn display_name(&self) -> &str {
        if !self.name.trim().is_empty() {
            return &self.name;
        }
        self.email.split('@').next().unwrap_or(&self.email)
    }

    /// Up to two uppercase initials for an avatar placeholder.
    pub fn initials(&self) -> String {
        let source = if self.name.trim().is_empty() {
            &self.email
        } else {
            &self.name
        };
        source
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect()
    }
}
