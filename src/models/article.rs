// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Scientific article records and statistics.

use super::{not_blank, validate_in_order};
use crate::error::Result;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use validator::Validate;

/// Review state. Owned by the server; the client never sets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleStatus {
    Pending,
    VerifiedAuto,
    VerifiedManual,
    Rejected,
}

impl ArticleStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ArticleStatus::Pending => "pending",
            ArticleStatus::VerifiedAuto => "verified_auto",
            ArticleStatus::VerifiedManual => "verified_manual",
            ArticleStatus::Rejected => "rejected",
        }
    }

    /// Vietnamese label shown in tables.
    pub fn label(self) -> &'static str {
        match self {
            ArticleStatus::Pending => "Chờ duyệt",
            ArticleStatus::VerifiedAuto => "Đã xác minh (tự động)",
            ArticleStatus::VerifiedManual => "Đã xác minh (thủ công)",
            ArticleStatus::Rejected => "Bị từ chối",
        }
    }

    pub fn is_verified(self) -> bool {
        matches!(
            self,
            ArticleStatus::VerifiedAuto | ArticleStatus::VerifiedManual
        )
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ArticleStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        [
            ArticleStatus::Pending,
            ArticleStatus::VerifiedAuto,
            ArticleStatus::VerifiedManual,
            ArticleStatus::Rejected,
        ]
        .into_iter()
        .find(|status| status.as_str() == s)
        .ok_or_else(|| format!("unknown article status: {}", s))
    }
}

/// Article as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub journal_name: String,
    pub publication_date: String,
    #[serde(default)]
    pub volume: String,
    #[serde(default)]
    pub issue: String,
    #[serde(default)]
    pub pages: String,
    #[serde(default)]
    pub doi: Option<String>,
    #[serde(default, deserialize_with = "bool_or_int")]
    pub is_main_author: bool,
    #[serde(default)]
    pub co_authors: String,
    /// Computed by the server
    #[serde(default)]
    pub calculated_points: f64,
    pub status: ArticleStatus,
    #[serde(default)]
    pub evidence_file: Option<String>,
    #[serde(default)]
    pub field_of_study: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Accepts `true`/`false` as well as `1`/`0`.
fn bool_or_int<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Int(i)) => i != 0,
        None => false,
    })
}

/// Create/update payload. Updates send the full object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ArticleForm {
    #[validate(custom(function = "not_blank", message = "Vui lòng nhập tiêu đề bài báo"))]
    pub title: String,
    #[validate(custom(function = "not_blank", message = "Vui lòng nhập tên tạp chí"))]
    pub journal_name: String,
    /// `YYYY-MM-DD`
    #[validate(custom(function = "not_blank", message = "Vui lòng chọn ngày xuất bản"))]
    pub publication_date: String,
    #[validate(custom(function = "not_blank", message = "Vui lòng nhập lĩnh vực nghiên cứu"))]
    pub field_of_study: String,
    #[validate(custom(function = "not_blank", message = "Vui lòng nhập nhà xuất bản"))]
    pub publisher: String,
    pub volume: String,
    pub issue: String,
    pub pages: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    pub is_main_author: bool,
    pub co_authors: String,
}

impl ArticleForm {
    /// Pre-fill an edit form from an existing article.
    pub fn from_article(article: &Article) -> Self {
        Self {
            title: article.title.clone(),
            journal_name: article.journal_name.clone(),
            publication_date: article.publication_date.clone(),
            field_of_study: article.field_of_study.clone(),
            publisher: article.publisher.clone(),
            volume: article.volume.clone(),
            issue: article.issue.clone(),
            pages: article.pages.clone(),
            doi: article.doi.clone().filter(|d| !d.trim().is_empty()),
            is_main_author: article.is_main_author,
            co_authors: article.co_authors.clone(),
        }
    }

    pub fn check(&self) -> Result<()> {
        validate_in_order(
            self,
            &[
                "title",
                "journal_name",
                "publication_date",
                "field_of_study",
                "publisher",
            ],
        )
    }
}

/// Query for `GET /api/me/articles`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArticleQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ArticleStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleList {
    pub articles: Vec<Article>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

/// Response of `GET /api/me/articles/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleStats {
    #[serde(default)]
    pub summary: StatsSummary,
    #[serde(default)]
    pub by_status: Vec<StatusCount>,
    #[serde(default)]
    pub by_year: Vec<YearCount>,
    #[serde(default)]
    pub top_journals: Vec<JournalCount>,
}

impl ArticleStats {
    /// Count for one status, 0 if the server omitted it.
    pub fn count_for(&self, status: ArticleStatus) -> u64 {
        self.by_status
            .iter()
            .filter(|s| s.status == status.as_str())
            .map(|s| s.count)
            .sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    #[serde(default)]
    pub total_articles: u64,
    #[serde(default)]
    pub total_points: f64,
    #[serde(default)]
    pub main_author_count: u64,
    #[serde(default)]
    pub total_journals: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearCount {
    pub year: i32,
    pub count: u64,
    #[serde(default)]
    pub total_points: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalCount {
    pub journal_name: String,
    pub count: u64,
}
