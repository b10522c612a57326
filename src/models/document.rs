// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! File uploads: supporting documents and avatar images.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Maximum avatar size (5 MiB).
pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

/// Maximum supporting-document size (10 MiB).
pub const MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;

const AVATAR_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/gif"];

const DOCUMENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "image/jpeg",
    "image/png",
    "image/gif",
];

/// A file held in memory, ready for multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing its MIME type from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to read {}: {}", path.display(), e))
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let mime_type = mime_from_extension(path).to_string();
        Ok(Self::new(file_name, mime_type, bytes))
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Check an avatar image before upload.
    pub fn check_avatar(&self) -> Result<()> {
        if self.bytes.is_empty() {
            return Err(AppError::Validation("Vui lòng chọn file ảnh".to_string()));
        }
        if !AVATAR_TYPES.contains(&self.mime_type.as_str()) {
            return Err(AppError::Validation(
                "Chỉ chấp nhận file ảnh (JPEG, PNG, GIF)".to_string(),
            ));
        }
        if self.size() > MAX_AVATAR_BYTES {
            return Err(AppError::Validation(
                "Kích thước file không được vượt quá 5MB".to_string(),
            ));
        }
        Ok(())
    }

    /// Check a supporting document before upload.
    pub fn check_document(&self) -> Result<()> {
        if self.size() > MAX_DOCUMENT_BYTES {
            return Err(AppError::Validation(
                "Kích thước file không được vượt quá 10MB".to_string(),
            ));
        }
        if !DOCUMENT_TYPES.contains(&self.mime_type.as_str()) {
            return Err(AppError::Validation(
                "Chỉ chấp nhận file PDF, Word, Excel, hoặc ảnh (JPG, PNG, GIF)".to_string(),
            ));
        }
        Ok(())
    }
}

fn mime_from_extension(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    }
}

/// Supporting document for a submitted work.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub work_id: i64,
    pub document_type: String,
    pub file: UploadFile,
}

impl DocumentUpload {
    pub fn check(&self) -> Result<()> {
        if self.document_type.trim().is_empty() {
            return Err(AppError::Validation(
                "Vui lòng chọn loại tài liệu".to_string(),
            ));
        }
        self.file.check_document()
    }
}

/// Response of `POST /api/users/upload-document`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentUploadResult {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub document_id: Option<i64>,
    #[serde(default)]
    pub file_path: Option<String>,
}

/// Human-readable file size ("0 Bytes", "1.5 KB", "2 MB").
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let exp = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exp = exp.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exp as i32);
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[exp])
}
