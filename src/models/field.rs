// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Fields of study reference list.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOfStudy {
    pub id: i64,
    pub name: String,
}

/// Envelope of `GET /api/fields-of-study`.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldsOfStudyResponse {
    #[serde(default)]
    pub fields_of_study: Vec<FieldOfStudy>,
}
