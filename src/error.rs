// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with user-facing messages.
//!
//! Every service call either returns a value or a single normalized
//! [`AppError`]. The `Display` output is what the UI shows.

use crate::storage::StorageError;
use serde::Deserialize;

/// Application error type surfaced to callers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Client-side check failed; nothing was sent.
    #[error("{0}")]
    Validation(String),

    /// Network failure, timeout, or undecodable response body.
    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx response from the backend.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// Successful response whose body is unusable. Carries the
    /// per-operation fallback; the detail is only logged.
    #[error("{message}")]
    UnexpectedResponse { message: String },

    /// 401 on an authenticated call. The local session is already gone.
    #[error("{0}")]
    Unauthorized(String),

    #[error("{}", messages::NOT_AUTHENTICATED)]
    NotAuthenticated,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// HTTP status attached to the error, if the backend produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Server { status, .. } => Some(*status),
            AppError::Unauthorized(_) => Some(401),
            _ => None,
        }
    }

    /// True if the error means the session is no longer usable.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, AppError::Unauthorized(_) | AppError::NotAuthenticated)
    }

    /// Build a server error from a response body, preferring the backend's
    /// `message`, then `detail`, then `fallback`.
    pub fn from_response_body(status: u16, body: &str, fallback: &str) -> Self {
        AppError::Server {
            status,
            message: server_message(body).unwrap_or_else(|| fallback.to_string()),
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<serde_json::Value>,
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// Extract the backend-provided message from an error body.
///
/// `detail` may be a list of validation entries (FastAPI style); the first
/// entry's `msg` is used in that case.
pub fn server_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .message
        .as_ref()
        .and_then(value_text)
        .or_else(|| parsed.detail.as_ref().and_then(value_text))
}

fn value_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Array(items) => items
            .first()
            .and_then(|item| item.get("msg"))
            .and_then(|msg| msg.as_str())
            .map(str::to_string),
        _ => None,
    }
}

/// Localized fallback messages used when the backend gives none.
pub mod messages {
    pub const LOGIN_FAILED: &str = "Đăng nhập thất bại";
    pub const REGISTER_FAILED: &str = "Đăng ký thất bại";
    pub const NETWORK_ERROR: &str = "Lỗi kết nối mạng";
    pub const SESSION_EXPIRED: &str = "Phiên đăng nhập đã hết hạn";
    pub const NOT_AUTHENTICATED: &str = "Bạn chưa đăng nhập";
    pub const PROFILE_GET_FAILED: &str = "Không thể lấy thông tin hồ sơ";
    pub const PROFILE_UPDATE_FAILED: &str = "Không thể cập nhật thông tin hồ sơ";
    pub const PROFILE_COMPLETE_FAILED: &str = "Không thể cập nhật hồ sơ";
    pub const AVATAR_UPLOAD_FAILED: &str = "Không thể upload ảnh đại diện";
    pub const DOCUMENT_UPLOAD_FAILED: &str = "Không thể tải lên tài liệu";
    pub const ARTICLES_LIST_FAILED: &str = "Không thể lấy danh sách bài báo";
    pub const ARTICLE_GET_FAILED: &str = "Không thể lấy thông tin bài báo";
    pub const ARTICLE_CREATE_FAILED: &str = "Không thể tạo bài báo";
    pub const ARTICLE_UPDATE_FAILED: &str = "Không thể cập nhật bài báo";
    pub const ARTICLE_DELETE_FAILED: &str = "Không thể xóa bài báo";
    pub const ARTICLE_STATS_FAILED: &str = "Không thể lấy thống kê bài báo";
    pub const FIELDS_LOAD_FAILED: &str = "Không thể tải danh sách lĩnh vực nghiên cứu";
}

/// Result type alias for service calls
pub type Result<T> = std::result::Result<T, AppError>;
