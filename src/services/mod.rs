// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - thin wrappers over the backend REST API.

pub mod api;
pub mod articles;
pub mod auth;
pub mod documents;
pub mod fields;
pub mod profile;

pub use api::{ApiClient, SessionEvent};
pub use articles::ArticleService;
pub use auth::{AuthService, Credentials, RegisterRequest};
pub use documents::DocumentService;
pub use fields::FieldService;
pub use profile::ProfileService;

/// Backend endpoint paths.
pub mod endpoints {
    pub const REGISTER: &str = "/api/users/register";
    pub const LOGIN: &str = "/api/users/login";
    pub const LOGOUT: &str = "/api/users/logout";
    pub const COMPLETION_STATUS: &str = "/api/users/me/completion-status";
    pub const COMPLETE_PROFILE: &str = "/api/users/me/complete-profile";
    pub const ME: &str = "/api/users/me";
    pub const UPLOAD_AVATAR: &str = "/api/users/upload-avatar";
    pub const UPLOAD_DOCUMENT: &str = "/api/users/upload-document";
    pub const ARTICLES: &str = "/api/me/articles";
    pub const ARTICLE_STATS: &str = "/api/me/articles/stats";
    pub const FIELDS_OF_STUDY: &str = "/api/fields-of-study";

    pub fn article(id: i64) -> String {
        format!("{}/{}", ARTICLES, id)
    }
}
