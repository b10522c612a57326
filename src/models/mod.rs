// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod article;
pub mod document;
pub mod field;
pub mod profile;
pub mod user;

pub use article::{Article, ArticleForm, ArticleList, ArticleQuery, ArticleStats, ArticleStatus};
pub use document::{
    format_file_size, DocumentUpload, DocumentUploadResult, UploadFile, MAX_AVATAR_BYTES,
    MAX_DOCUMENT_BYTES,
};
pub use field::FieldOfStudy;
pub use profile::{
    AcademicMerits, CachedProfile, ProfileCompletionStatus, ProfileForm, UserProfile,
};
pub use user::{Role, User, UserPatch};

use crate::error::{AppError, Result};
use validator::{Validate, ValidationError};

/// Rejects empty and whitespace-only strings.
pub(crate) fn not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Run `validator` checks and report the first failing field in form order.
pub(crate) fn validate_in_order<T: Validate>(value: &T, order: &[&str]) -> Result<()> {
    let Err(errors) = value.validate() else {
        return Ok(());
    };
    let fields = errors.field_errors();
    let message = order
        .iter()
        .filter_map(|name| fields.get(*name))
        .chain(fields.values())
        .flat_map(|errs| errs.iter())
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Dữ liệu không hợp lệ".to_string());
    Err(AppError::Validation(message))
}
