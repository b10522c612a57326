// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP client for the profile backend.
//!
//! Handles:
//! - Bearer token injection from the session store
//! - Error normalization (server `message`/`detail`, localized fallbacks)
//! - Global sign-out when an authenticated call gets 401

use crate::config::Config;
use crate::error::{messages, AppError, Result};
use crate::models::UploadFile;
use crate::storage::SessionStore;
use reqwest::{multipart, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tokio::sync::broadcast;

/// Session lifecycle notifications emitted by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The backend rejected the stored token. Storage is already purged.
    Expired,
}

/// How a request is authenticated.
#[derive(Debug, Clone, Copy)]
enum Auth<'a> {
    /// Token from the session store; 401 tears the session down.
    Session,
    /// Explicit token not yet persisted (login flow).
    Token(&'a str),
    Public,
}

/// Backend API client.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    sessions: SessionStore,
    events: broadcast::Sender<SessionEvent>,
    login_timeout: Duration,
    upload_timeout: Duration,
}

impl ApiClient {
    pub fn new(config: &Config, sessions: SessionStore) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {}", e)))?;
        let (events, _) = broadcast::channel(16);

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            sessions,
            events,
            login_timeout: config.login_timeout,
            upload_timeout: config.upload_timeout,
        })
    }

    /// Receive [`SessionEvent`]s.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    // ─── Authenticated calls ─────────────────────────────────────

    /// GET with JSON response.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, fallback: &str) -> Result<T> {
        let response = self
            .execute(self.request(Method::GET, path), Auth::Session, fallback)
            .await?;
        read_json(response, fallback).await
    }

    /// GET with query parameters and JSON response.
    pub async fn get_json_query<Q: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Q,
        fallback: &str,
    ) -> Result<T> {
        let request = self.request(Method::GET, path).query(query);
        let response = self.execute(request, Auth::Session, fallback).await?;
        read_json(response, fallback).await
    }

    /// POST a JSON body, JSON response.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<T> {
        let request = self.request(Method::POST, path).json(body);
        let response = self.execute(request, Auth::Session, fallback).await?;
        read_json(response, fallback).await
    }

    /// PUT a JSON body, JSON response.
    pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<T> {
        let request = self.request(Method::PUT, path).json(body);
        let response = self.execute(request, Auth::Session, fallback).await?;
        read_json(response, fallback).await
    }

    /// PUT a JSON body and return the raw response text (may be empty).
    pub async fn put_for_text<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<String> {
        let request = self.request(Method::PUT, path).json(body);
        let response = self.execute(request, Auth::Session, fallback).await?;
        read_text(response, fallback).await
    }

    /// POST with no body, ignoring the response body.
    pub async fn post_empty(&self, path: &str, fallback: &str) -> Result<()> {
        self.execute(self.request(Method::POST, path), Auth::Session, fallback)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, path: &str, fallback: &str) -> Result<()> {
        self.execute(self.request(Method::DELETE, path), Auth::Session, fallback)
            .await?;
        Ok(())
    }

    /// Multipart upload with the long upload timeout. Returns raw text.
    pub async fn post_multipart_for_text(
        &self,
        path: &str,
        form: multipart::Form,
        fallback: &str,
    ) -> Result<String> {
        let request = self
            .request(Method::POST, path)
            .multipart(form)
            .timeout(self.upload_timeout);
        let response = self.execute(request, Auth::Session, fallback).await?;
        read_text(response, fallback).await
    }

    // ─── Unauthenticated / explicit-token calls ──────────────────

    /// POST to a public endpoint. `login` selects the login timeout.
    pub async fn post_public<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        login: bool,
        fallback: &str,
    ) -> Result<Response> {
        let mut request = self.request(Method::POST, path).json(body);
        if login {
            request = request.timeout(self.login_timeout);
        }
        self.execute(request, Auth::Public, fallback).await
    }

    pub async fn get_public_json<T: DeserializeOwned>(
        &self,
        path: &str,
        fallback: &str,
    ) -> Result<T> {
        let response = self
            .execute(self.request(Method::GET, path), Auth::Public, fallback)
            .await?;
        read_json(response, fallback).await
    }

    /// GET with a token that is not (yet) in the session store.
    pub async fn get_json_with_token<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
        fallback: &str,
    ) -> Result<T> {
        let response = self
            .execute(self.request(Method::GET, path), Auth::Token(token), fallback)
            .await?;
        read_json(response, fallback).await
    }

    // ─── Core ────────────────────────────────────────────────────

    async fn execute(
        &self,
        request: RequestBuilder,
        auth: Auth<'_>,
        fallback: &str,
    ) -> Result<Response> {
        let request = match auth {
            Auth::Session => {
                let token = self.sessions.token().ok_or(AppError::NotAuthenticated)?;
                request.bearer_auth(token)
            }
            Auth::Token(token) => request.bearer_auth(token),
            Auth::Public => request,
        };

        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, timeout = e.is_timeout(), "Request failed");
            AppError::Transport {
                message: fallback.to_string(),
                source: e,
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();

        if status == StatusCode::UNAUTHORIZED && matches!(auth, Auth::Session) {
            self.expire_session();
            let message = crate::error::server_message(&body)
                .unwrap_or_else(|| messages::SESSION_EXPIRED.to_string());
            return Err(AppError::Unauthorized(message));
        }

        tracing::debug!(status = %status, "Backend rejected request");
        Err(AppError::from_response_body(status.as_u16(), &body, fallback))
    }

    /// Purge the stored session and notify subscribers.
    fn expire_session(&self) {
        tracing::info!("Backend returned 401, signing out");
        self.sessions.clear();
        // No subscribers is fine.
        let _ = self.events.send(SessionEvent::Expired);
    }
}

/// Build a multipart part from an in-memory file.
pub(crate) fn file_part(file: &UploadFile) -> Result<multipart::Part> {
    multipart::Part::bytes(file.bytes.clone())
        .file_name(file.file_name.clone())
        .mime_str(&file.mime_type)
        .map_err(|e| AppError::Validation(format!("Invalid MIME type {}: {}", file.mime_type, e)))
}

pub(crate) async fn read_json<T: DeserializeOwned>(response: Response, fallback: &str) -> Result<T> {
    response.json().await.map_err(|e| {
        tracing::warn!(error = %e, "Failed to decode response body");
        AppError::Transport {
            message: fallback.to_string(),
            source: e,
        }
    })
}

async fn read_text(response: Response, fallback: &str) -> Result<String> {
    response.text().await.map_err(|e| AppError::Transport {
        message: fallback.to_string(),
        source: e,
    })
}
