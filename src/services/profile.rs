// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile endpoints: read, full-replace update, completion, avatar.

use super::api::{file_part, ApiClient};
use super::endpoints;
use crate::error::{messages, Result};
use crate::models::{ProfileCompletionStatus, ProfileForm, UploadFile, UserProfile};
use reqwest::multipart;

#[derive(Clone)]
pub struct ProfileService {
    api: ApiClient,
}

impl ProfileService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetch the signed-in user's profile.
    pub async fn get_profile(&self) -> Result<UserProfile> {
        self.api
            .get_json(endpoints::ME, messages::PROFILE_GET_FAILED)
            .await
    }

    /// Replace the profile. Returns the updated profile, re-fetching it if
    /// the backend's response does not carry one.
    pub async fn update_profile(&self, form: &ProfileForm) -> Result<UserProfile> {
        form.check()?;
        let body = self
            .api
            .put_for_text(endpoints::ME, form, messages::PROFILE_UPDATE_FAILED)
            .await?;
        self.profile_or_refetch(&body).await
    }

    /// Upload a new avatar image.
    pub async fn upload_avatar(&self, file: &UploadFile) -> Result<UserProfile> {
        file.check_avatar()?;
        let form = multipart::Form::new().part("file", file_part(file)?);
        let body = self
            .api
            .post_multipart_for_text(endpoints::UPLOAD_AVATAR, form, messages::AVATAR_UPLOAD_FAILED)
            .await?;
        tracing::info!(file = %file.file_name, size = file.size(), "Avatar uploaded");
        self.profile_or_refetch(&body).await
    }

    pub async fn completion_status(&self) -> Result<ProfileCompletionStatus> {
        self.api
            .get_json(endpoints::COMPLETION_STATUS, messages::PROFILE_GET_FAILED)
            .await
    }

    /// First-time profile completion.
    pub async fn complete_profile(&self, form: &ProfileForm) -> Result<()> {
        form.check()?;
        self.api
            .put_for_text(
                endpoints::COMPLETE_PROFILE,
                form,
                messages::PROFILE_COMPLETE_FAILED,
            )
            .await?;
        Ok(())
    }

    async fn profile_or_refetch(&self, body: &str) -> Result<UserProfile> {
        match parse_full_profile(body) {
            Some(profile) => Ok(profile),
            None => {
                tracing::debug!("Response carried no usable profile, re-fetching");
                self.get_profile().await
            }
        }
    }
}

/// A response body counts as a profile only if it has `id` and `email`.
fn parse_full_profile(body: &str) -> Option<UserProfile> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let has_id = value.get("id").is_some_and(|v| !v.is_null());
    let has_email = value
        .get("email")
        .and_then(|v| v.as_str())
        .is_some_and(|s| !s.is_empty());
    if !(has_id && has_email) {
        return None;
    }
    serde_json::from_value(value).ok()
}
