// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Supporting-document uploads.

use super::api::{file_part, ApiClient};
use super::endpoints;
use crate::error::{messages, AppError, Result};
use crate::models::{DocumentUpload, DocumentUploadResult};
use reqwest::multipart;

#[derive(Clone)]
pub struct DocumentService {
    api: ApiClient,
}

impl DocumentService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn upload(&self, upload: &DocumentUpload) -> Result<DocumentUploadResult> {
        upload.check()?;

        let form = multipart::Form::new()
            .text("work_id", upload.work_id.to_string())
            .text("document_type", upload.document_type.clone())
            .part("file", file_part(&upload.file)?);

        let body = self
            .api
            .post_multipart_for_text(
                endpoints::UPLOAD_DOCUMENT,
                form,
                messages::DOCUMENT_UPLOAD_FAILED,
            )
            .await?;

        let result: DocumentUploadResult = serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(error = %e, "Unexpected upload response");
            AppError::UnexpectedResponse {
                message: messages::DOCUMENT_UPLOAD_FAILED.to_string(),
            }
        })?;
        tracing::info!(
            work_id = upload.work_id,
            document_id = ?result.document_id,
            "Document uploaded"
        );
        Ok(result)
    }
}
