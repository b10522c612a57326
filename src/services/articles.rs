// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Article CRUD for the signed-in user.
//!
//! Status and points are server-owned; this client only sends the form.

use super::api::ApiClient;
use super::endpoints;
use crate::error::{messages, Result};
use crate::models::{Article, ArticleForm, ArticleList, ArticleQuery, ArticleStats};

#[derive(Clone)]
pub struct ArticleService {
    api: ApiClient,
}

impl ArticleService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self, query: &ArticleQuery) -> Result<ArticleList> {
        self.api
            .get_json_query(endpoints::ARTICLES, query, messages::ARTICLES_LIST_FAILED)
            .await
    }

    pub async fn get(&self, id: i64) -> Result<Article> {
        self.api
            .get_json(&endpoints::article(id), messages::ARTICLE_GET_FAILED)
            .await
    }

    pub async fn create(&self, form: &ArticleForm) -> Result<Article> {
        form.check()?;
        let article: Article = self
            .api
            .post_json(endpoints::ARTICLES, form, messages::ARTICLE_CREATE_FAILED)
            .await?;
        tracing::info!(article_id = article.id, "Article created");
        Ok(article)
    }

    /// Full replace.
    pub async fn update(&self, id: i64, form: &ArticleForm) -> Result<Article> {
        form.check()?;
        self.api
            .put_json(&endpoints::article(id), form, messages::ARTICLE_UPDATE_FAILED)
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.api
            .delete(&endpoints::article(id), messages::ARTICLE_DELETE_FAILED)
            .await?;
        tracing::info!(article_id = id, "Article deleted");
        Ok(())
    }

    pub async fn stats(&self) -> Result<ArticleStats> {
        self.api
            .get_json(endpoints::ARTICLE_STATS, messages::ARTICLE_STATS_FAILED)
            .await
    }
}
