// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HSKH portal: client core for the "Hồ sơ khoa học" researcher dashboard.
//!
//! This crate keeps the signed-in session, caches the researcher profile,
//! talks to the profile backend and decides which screen a visitor may see.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
pub mod time_utils;

use config::Config;
use error::Result;
use models::{ProfileForm, UploadFile, User, UserPatch, UserProfile};
use routes::GuardDecision;
use services::{
    ApiClient, ArticleService, AuthService, Credentials, DocumentService, FieldService,
    ProfileService, SessionEvent,
};
use state::{AuthContext, Location, Navigator, ProfileContext};
use std::sync::Arc;
use storage::{FileStore, ProfileCache, SessionStore, SharedStore};
use time_utils::SharedClock;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

/// Application composition root.
pub struct Portal {
    pub config: Config,
    pub api: ApiClient,
    pub auth: Arc<AuthContext>,
    pub profile: Arc<ProfileContext>,
    pub profiles: ProfileService,
    pub articles: ArticleService,
    pub documents: DocumentService,
    pub fields: FieldService,
    pub navigator: Arc<Navigator>,
}

impl Portal {
    /// Wire everything on top of `store`. The persisted session (if any) is
    /// restored and the initial location resolved.
    pub fn new(config: Config, store: SharedStore, clock: SharedClock) -> Result<Self> {
        let sessions = SessionStore::new(Arc::clone(&store));
        let api = ApiClient::new(&config, sessions)?;

        let auth = Arc::new(AuthContext::new(AuthService::new(
            api.clone(),
            Arc::clone(&clock),
        )));
        let profiles = ProfileService::new(api.clone());
        let profile = Arc::new(ProfileContext::new(
            profiles.clone(),
            ProfileCache::new(store, clock),
            auth.subscribe(),
        ));

        let snapshot = auth.init();
        let navigator = Arc::new(Navigator::new(routes::ROOT_PATH));
        navigator.apply(
            routes::ROOT_PATH,
            &routes::navigate(routes::ROOT_PATH, &snapshot),
        );

        Ok(Self {
            articles: ArticleService::new(api.clone()),
            documents: DocumentService::new(api.clone()),
            fields: FieldService::new(api.clone()),
            profiles,
            config,
            api,
            auth,
            profile,
            navigator,
        })
    }

    /// Open with the durable file store at `config.storage_path`.
    pub fn open(config: Config) -> Result<Self> {
        let store: SharedStore = Arc::new(FileStore::open(&config.storage_path)?);
        Self::new(config, store, time_utils::system_clock())
    }

    /// Spawn the background listeners: session expiry and profile sync.
    pub fn start(&self) -> Vec<JoinHandle<()>> {
        let mut events = self.api.subscribe();
        let auth = Arc::clone(&self.auth);
        let profile = Arc::clone(&self.profile);
        let navigator = Arc::clone(&self.navigator);

        let session_listener = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => on_session_event(&auth, &profile, &navigator, event),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "Session events lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        vec![session_listener, self.profile.watch_auth()]
    }

    /// Apply a session event synchronously (no listener task required).
    pub fn handle_session_event(&self, event: SessionEvent) {
        on_session_event(&self.auth, &self.profile, &self.navigator, event);
    }

    /// Navigate to `path`, moving wherever the guard decides.
    pub fn navigate(&self, path: &str) -> GuardDecision {
        let decision = routes::navigate(path, &self.auth.snapshot());
        self.navigator.apply(path, &decision);
        decision
    }

    pub fn location(&self) -> Location {
        self.navigator.current()
    }

    /// Sign in, load the profile for `user` sessions, and go to the
    /// remembered screen or the role's landing screen.
    pub async fn login(&self, credentials: &Credentials) -> Result<User> {
        let user = self.auth.login(credentials).await?;
        self.profile.sync_with_auth().await;

        let target = self
            .navigator
            .take_return_path()
            .unwrap_or_else(|| user.role.default_route().to_string());
        self.navigate(&target);
        Ok(user)
    }

    /// Sign out. Always ends on the login screen.
    pub async fn logout(&self) {
        self.auth.logout().await;
        self.profile.clear();
        self.navigator.to_login();
    }

    /// Save the profile form and propagate the new name to the session user.
    pub async fn update_profile(&self, form: &ProfileForm) -> Result<UserProfile> {
        let profile = self.profiles.update_profile(form).await?;
        self.profile.update(profile.clone());
        self.auth.update_user(&UserPatch {
            name: Some(profile.full_name.clone()).filter(|n| !n.trim().is_empty()),
            ..UserPatch::default()
        });
        Ok(profile)
    }

    /// Upload a new avatar and propagate it to the session user.
    pub async fn upload_avatar(&self, file: &UploadFile) -> Result<UserProfile> {
        let profile = self.profiles.upload_avatar(file).await?;
        self.profile.update(profile.clone());
        if let Some(avatar) = profile.avatar() {
            self.auth.update_user(&UserPatch::avatar(avatar));
        }
        Ok(profile)
    }

    /// First-time completion, then reload the profile from the server.
    pub async fn complete_profile(&self, form: &ProfileForm) -> Result<Option<UserProfile>> {
        self.profiles.complete_profile(form).await?;
        Ok(self.profile.refresh().await)
    }
}

fn on_session_event(
    auth: &AuthContext,
    profile: &ProfileContext,
    navigator: &Navigator,
    event: SessionEvent,
) {
    if !auth.handle_session_event(event) {
        return;
    }
    match event {
        SessionEvent::Expired => {
            profile.clear();
            navigator.to_login();
        }
    }
}
