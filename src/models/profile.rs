// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Academic profile of a `user`-role account.

use super::{not_blank, validate_in_order};
use crate::error::Result;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Full profile as returned by `GET /api/users/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    #[serde(default)]
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub avatar_path: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(flatten)]
    pub merits: AcademicMerits,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl UserProfile {
    /// Avatar to show, preferring the absolute URL.
    pub fn avatar(&self) -> Option<&str> {
        self.avatar_url
            .as_deref()
            .or(self.avatar_path.as_deref())
            .filter(|s| !s.is_empty())
    }
}

/// Academic-merit counters. Missing or null values read as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcademicMerits {
    /// Years of service
    #[serde(rename = "thoi_gian_cong_tac", default, deserialize_with = "count")]
    pub years_of_service: u32,
    /// Years since doctorate
    #[serde(rename = "so_nam_sau_ts", default, deserialize_with = "count")]
    pub years_post_doctorate: u32,
    /// Standard teaching hours
    #[serde(rename = "so_gio_giang_chuan", default, deserialize_with = "count")]
    pub standard_teaching_hours: u32,
    #[serde(
        rename = "so_hoc_vien_thac_si_huong_dan",
        default,
        deserialize_with = "count"
    )]
    pub masters_students_supervised: u32,
    #[serde(rename = "so_ncs_tien_si_huong_dan", default, deserialize_with = "count")]
    pub doctoral_students_supervised: u32,
    /// Ministry-level research projects
    #[serde(rename = "so_de_tai_cap_bo", default, deserialize_with = "count")]
    pub ministry_projects: u32,
    /// Institution-level research projects
    #[serde(rename = "so_de_tai_cap_co_so", default, deserialize_with = "count")]
    pub institution_projects: u32,
}

fn count<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u32, D::Error> {
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or(0))
}

/// Full-replace profile payload, used both for `PUT /api/users/me` and
/// first-time completion (`PUT /api/users/me/complete-profile`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ProfileForm {
    #[validate(custom(function = "not_blank", message = "Vui lòng nhập họ tên"))]
    pub full_name: String,
    #[validate(custom(function = "not_blank", message = "Vui lòng nhập số điện thoại"))]
    pub phone_number: String,
    /// `YYYY-MM-DD`
    #[validate(custom(function = "not_blank", message = "Vui lòng nhập ngày sinh"))]
    pub birth_date: String,
    #[serde(flatten)]
    pub merits: AcademicMerits,
}

impl ProfileForm {
    /// Pre-fill an edit form from the current profile.
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            full_name: profile.full_name.clone(),
            phone_number: profile.phone_number.clone().unwrap_or_default(),
            birth_date: profile.birth_date.clone().unwrap_or_default(),
            merits: profile.merits,
        }
    }

    pub fn check(&self) -> Result<()> {
        validate_in_order(self, &["full_name", "phone_number", "birth_date"])
    }
}

/// Response of `GET /api/users/me/completion-status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileCompletionStatus {
    #[serde(default, deserialize_with = "strict_true")]
    pub is_first_time: bool,
    #[serde(default)]
    pub completion_percentage: f64,
    #[serde(default)]
    pub required_fields: Vec<String>,
    #[serde(default)]
    pub missing_fields: Vec<String>,
    #[serde(default)]
    pub next_step: String,
    #[serde(default)]
    pub can_submit_works: bool,
}

/// Only a literal JSON `true` counts; `1`, `"true"` or null do not.
fn strict_true<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value == serde_json::Value::Bool(true))
}

/// Profile snapshot plus the time it was cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedProfile {
    /// Session user the entry belongs to
    pub owner: String,
    pub data: UserProfile,
    /// Epoch milliseconds
    pub timestamp: i64,
}
