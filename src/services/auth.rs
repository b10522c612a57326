// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login, logout and registration against the backend.

use super::api::{read_json, ApiClient};
use super::endpoints;
use crate::error::{messages, AppError, Result};
use crate::models::{not_blank, validate_in_order, Role, User, UserProfile};
use crate::time_utils::SharedClock;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login form.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct Credentials {
    #[validate(
        length(min = 1, message = "Vui lòng nhập email"),
        email(message = "Email không hợp lệ")
    )]
    pub email: String,
    #[validate(length(min = 1, message = "Vui lòng nhập mật khẩu"))]
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into(),
        }
    }

    pub fn check(&self) -> Result<()> {
        validate_in_order(self, &["email", "password"])
    }
}

/// Registration form.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Email không hợp lệ"))]
    pub email: String,
    #[validate(length(min = 6, message = "Mật khẩu phải có ít nhất 6 ký tự"))]
    pub password: String,
    #[validate(custom(function = "not_blank", message = "Vui lòng nhập họ tên"))]
    pub full_name: String,
}

impl RegisterRequest {
    pub fn check(&self) -> Result<()> {
        validate_in_order(self, &["email", "password", "full_name"])
    }
}

/// Response of `POST /api/users/login`.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
    #[serde(default)]
    #[allow(dead_code)]
    token_type: Option<String>,
    #[serde(default)]
    role: Option<Role>,
}

/// Authentication service. Owns the persisted session.
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
    clock: SharedClock,
}

impl AuthService {
    pub fn new(api: ApiClient, clock: SharedClock) -> Self {
        Self { api, clock }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Sign in and persist the session.
    ///
    /// For `user` accounts the profile is fetched to fill in name and avatar;
    /// if that fetch fails a minimal user is synthesized instead.
    pub async fn login(&self, credentials: &Credentials) -> Result<User> {
        credentials.check()?;

        let response = self
            .api
            .post_public(endpoints::LOGIN, credentials, true, messages::LOGIN_FAILED)
            .await?;
        let login: LoginResponse = read_json(response, messages::LOGIN_FAILED).await?;

        if login.access_token.is_empty() {
            tracing::warn!("Login response missing access token");
            return Err(AppError::UnexpectedResponse {
                message: messages::LOGIN_FAILED.to_string(),
            });
        }

        // Backend omits role for plain accounts.
        let role = login.role.unwrap_or(Role::User);

        let mut user = None;
        if role == Role::User {
            match self
                .api
                .get_json_with_token::<UserProfile>(
                    endpoints::ME,
                    &login.access_token,
                    messages::PROFILE_GET_FAILED,
                )
                .await
            {
                Ok(profile) => user = Some(user_from_profile(&profile, role)),
                Err(e) => {
                    tracing::warn!(error = %e, "Profile fetch after login failed, using fallback user");
                }
            }
        }
        let user = user.unwrap_or_else(|| self.fallback_user(&credentials.email, role));

        self.api.sessions().set(&login.access_token, &user)?;
        tracing::info!(user_id = %user.id, role = %user.role, "Signed in");
        Ok(user)
    }

    fn fallback_user(&self, email: &str, role: Role) -> User {
        User {
            id: format!("user_{}", self.clock.now_millis()),
            email: email.to_string(),
            name: match role {
                Role::Admin => "Administrator".to_string(),
                Role::User => "User".to_string(),
            },
            role,
            avatar: None,
        }
    }

    /// Sign out. The server is notified best-effort; local state is always cleared.
    pub async fn logout(&self) {
        if self.api.sessions().token().is_some() {
            if let Err(e) = self
                .api
                .post_empty(endpoints::LOGOUT, messages::NETWORK_ERROR)
                .await
            {
                tracing::warn!(error = %e, "Logout notification failed");
            }
        }
        self.api.sessions().clear();
        tracing::info!("Signed out");
    }

    /// Create an account. Does not sign in.
    pub async fn register(&self, request: &RegisterRequest) -> Result<()> {
        request.check()?;
        self.api
            .post_public(
                endpoints::REGISTER,
                request,
                false,
                messages::REGISTER_FAILED,
            )
            .await?;
        tracing::info!("Account registered");
        Ok(())
    }

    pub fn current_user(&self) -> Option<User> {
        self.api.sessions().current_user()
    }

    /// True if a complete, parseable session is stored.
    pub fn is_authenticated(&self) -> bool {
        self.api.sessions().get().is_some()
    }
}

/// Session user derived from a fetched profile.
pub fn user_from_profile(profile: &UserProfile, role: Role) -> User {
    User {
        id: profile.id.to_string(),
        email: profile.email.clone(),
        name: if profile.full_name.trim().is_empty() {
            "User".to_string()
        } else {
            profile.full_name.clone()
        },
        role,
        avatar: profile.avatar().map(str::to_string),
    }
}
