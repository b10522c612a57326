// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fields-of-study reference list (public endpoint).

use super::api::ApiClient;
use super::endpoints;
use crate::error::{messages, Result};
use crate::models::field::{FieldOfStudy, FieldsOfStudyResponse};

#[derive(Clone)]
pub struct FieldService {
    api: ApiClient,
}

impl FieldService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<FieldOfStudy>> {
        let response: FieldsOfStudyResponse = self
            .api
            .get_public_json(endpoints::FIELDS_OF_STUDY, messages::FIELDS_LOAD_FAILED)
            .await?;
        Ok(response.fields_of_study)
    }
}
