// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reactive application state. Each context publishes immutable snapshots
//! over a `tokio::sync::watch` channel.

pub mod auth;
pub mod navigation;
pub mod profile;

pub use auth::{AuthContext, AuthSnapshot};
pub use navigation::{Location, Navigator};
pub use profile::{ProfileContext, ProfileSnapshot};
