// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile loading, caching and updates for `user` sessions.

use hskh_portal::error::AppError;
use hskh_portal::models::{ProfileForm, UploadFile, User, UserProfile};
use hskh_portal::services::{Credentials, SessionEvent};
use hskh_portal::storage::{keys, KeyValueStore, PROFILE_CACHE_TTL_MS};
use mockito::Matcher;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

mod common;
use common::{admin, profile_json, researcher, signed_in_portal};

#[tokio::test]
async fn test_second_fetch_served_from_cache() {
    let mut server = mockito::Server::new_async().await;
    let me = server
        .mock("GET", "/api/users/me")
        .with_status(200)
        .with_body(profile_json("Nguyễn Văn A"))
        .expect(1)
        .create_async()
        .await;

    let t = signed_in_portal(&server.url(), "tok-13", &researcher());
    let first = t.portal.profile.fetch(false).await.expect("network fetch");
    t.clock.advance(PROFILE_CACHE_TTL_MS);
    let second = t.portal.profile.fetch(false).await.expect("cache hit");

    me.assert_async().await;
    assert_eq!(first, second);
    assert_eq!(first.merits.standard_teaching_hours, 270);
    assert_eq!(first.merits.doctoral_students_supervised, 0, "null reads as 0");
    assert!(t.store.get(keys::PROFILE_CACHE).is_some());
}

#[tokio::test]
async fn test_expired_cache_and_refresh_hit_network() {
    let mut server = mockito::Server::new_async().await;
    let me = server
        .mock("GET", "/api/users/me")
        .with_status(200)
        .with_body(profile_json("Nguyễn Văn A"))
        .expect(3)
        .create_async()
        .await;

    let t = signed_in_portal(&server.url(), "tok-13", &researcher());
    t.portal.profile.fetch(false).await.unwrap();
    t.portal.profile.refresh().await.unwrap();
    t.clock.advance(PROFILE_CACHE_TTL_MS + 1);
    t.portal.profile.fetch(false).await.unwrap();

    me.assert_async().await;
}

#[tokio::test]
async fn test_fetch_failure_sets_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/users/me")
        .with_status(500)
        .with_body(r#"{"message": "Lỗi máy chủ"}"#)
        .create_async()
        .await;

    let t = signed_in_portal(&server.url(), "tok-13", &researcher());
    assert!(t.portal.profile.fetch(false).await.is_none());

    let snapshot = t.portal.profile.snapshot();
    assert_eq!(snapshot.error.as_deref(), Some("Lỗi máy chủ"));
    assert!(!snapshot.is_loading);
    assert!(snapshot.profile.is_none());
    assert!(t.portal.auth.is_authenticated(), "500 keeps the session");
}

#[tokio::test]
async fn test_admin_session_never_fetches_profile() {
    let mut server = mockito::Server::new_async().await;
    let me = server
        .mock("GET", "/api/users/me")
        .expect(0)
        .create_async()
        .await;

    let t = signed_in_portal(&server.url(), "tok", &admin());
    assert!(t.portal.profile.fetch(true).await.is_none());
    t.portal.profile.sync_with_auth().await;

    me.assert_async().await;
    assert_eq!(t.portal.profile.snapshot().profile, None);
}

#[tokio::test]
async fn test_cache_from_other_user_is_ignored() {
    let mut server = mockito::Server::new_async().await;
    let me = server
        .mock("GET", "/api/users/me")
        .with_status(200)
        .with_body(profile_json("Nguyễn Văn A"))
        .expect(2)
        .create_async()
        .await;

    let t = signed_in_portal(&server.url(), "tok-13", &researcher());
    t.portal.profile.fetch(false).await.unwrap();
    let cached = t.store.get(keys::PROFILE_CACHE).unwrap();

    let other = User {
        id: "14".into(),
        email: "le.thi.c@example.edu.vn".into(),
        ..researcher()
    };
    let t2 = signed_in_portal(&server.url(), "tok-14", &other);
    t2.store.set(keys::PROFILE_CACHE, cached).unwrap();
    t2.portal.profile.fetch(false).await.unwrap();

    me.assert_async().await;
}

#[tokio::test]
async fn test_sync_with_auth_loads_once_per_identity() {
    let mut server = mockito::Server::new_async().await;
    let me = server
        .mock("GET", "/api/users/me")
        .with_status(200)
        .with_body(profile_json("Nguyễn Văn A"))
        .expect(1)
        .create_async()
        .await;

    let t = signed_in_portal(&server.url(), "tok-13", &researcher());
    t.portal.profile.sync_with_auth().await;
    t.portal.profile.sync_with_auth().await;

    me.assert_async().await;
    assert_eq!(
        t.portal.profile.snapshot().profile.map(|p| p.full_name),
        Some("Nguyễn Văn A".to_string())
    );

    t.portal.profile.clear();
    assert_eq!(t.portal.profile.snapshot(), Default::default());
    assert!(t.store.get(keys::PROFILE_CACHE).is_none());
}

#[tokio::test]
async fn test_update_profile_refetches_when_response_is_bare() {
    let mut server = mockito::Server::new_async().await;
    let put = server
        .mock("PUT", "/api/users/me")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "full_name": "Nguyễn Văn An",
            "so_gio_giang_chuan": 270
        })))
        .with_status(200)
        .with_body(r#"{"message": "Cập nhật thành công"}"#)
        .create_async()
        .await;
    let me = server
        .mock("GET", "/api/users/me")
        .with_status(200)
        .with_body(profile_json("Nguyễn Văn An"))
        .create_async()
        .await;

    let t = signed_in_portal(&server.url(), "tok-13", &researcher());
    let current: hskh_portal::models::UserProfile =
        serde_json::from_str(&profile_json("Nguyễn Văn A")).unwrap();
    let form = ProfileForm {
        full_name: "Nguyễn Văn An".into(),
        ..ProfileForm::from_profile(&current)
    };

    let updated = t.portal.update_profile(&form).await.unwrap();

    put.assert_async().await;
    me.assert_async().await;
    assert_eq!(updated.full_name, "Nguyễn Văn An");
    assert_eq!(
        t.portal.profile.snapshot().profile.map(|p| p.full_name),
        Some("Nguyễn Văn An".to_string())
    );
    assert_eq!(t.portal.auth.current_user().unwrap().name, "Nguyễn Văn An");
}

#[tokio::test]
async fn test_update_profile_validation() {
    let t = signed_in_portal(common::UNREACHABLE, "tok-13", &researcher());
    let current: hskh_portal::models::UserProfile =
        serde_json::from_str(&profile_json("Nguyễn Văn A")).unwrap();
    let form = ProfileForm {
        phone_number: "  ".into(),
        ..ProfileForm::from_profile(&current)
    };

    let err = t.portal.update_profile(&form).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(err.to_string(), "Vui lòng nhập số điện thoại");
}

#[tokio::test]
async fn test_avatar_upload_updates_user() {
    let mut server = mockito::Server::new_async().await;
    let mut body: serde_json::Value = serde_json::from_str(&profile_json("Nguyễn Văn A")).unwrap();
    body["avatar_url"] = "https://cdn.example.edu.vn/avatars/13.png".into();
    let upload = server
        .mock("POST", "/api/users/upload-avatar")
        .match_header("authorization", "Bearer tok-13")
        .match_header("content-type", Matcher::Regex("^multipart/form-data".into()))
        .with_status(200)
        .with_body(body.to_string())
        .create_async()
        .await;

    let t = signed_in_portal(&server.url(), "tok-13", &researcher());
    let file = UploadFile::new("me.png", "image/png", vec![0x89, b'P', b'N', b'G']);
    let profile = t.portal.upload_avatar(&file).await.unwrap();

    upload.assert_async().await;
    assert_eq!(profile.avatar(), Some("https://cdn.example.edu.vn/avatars/13.png"));
    assert_eq!(
        t.portal.auth.current_user().unwrap().avatar.as_deref(),
        Some("https://cdn.example.edu.vn/avatars/13.png")
    );
}

#[tokio::test]
async fn test_avatar_rejected_locally() {
    let mut server = mockito::Server::new_async().await;
    let upload = server
        .mock("POST", "/api/users/upload-avatar")
        .expect(0)
        .create_async()
        .await;

    let t = signed_in_portal(&server.url(), "tok-13", &researcher());
    let pdf = UploadFile::new("cv.pdf", "application/pdf", vec![1, 2, 3]);
    let err = t.portal.upload_avatar(&pdf).await.unwrap_err();

    upload.assert_async().await;
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_completion_status_strict_first_time() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/users/me/completion-status")
        .with_status(200)
        .with_body(
            r#"{"is_first_time": 1, "completion_percentage": 60.0,
                "required_fields": ["full_name"], "missing_fields": ["birth_date"],
                "next_step": "complete_profile", "can_submit_works": false}"#,
        )
        .create_async()
        .await;

    let t = signed_in_portal(&server.url(), "tok-13", &researcher());
    let status = t.portal.profiles.completion_status().await.unwrap();

    assert!(!status.is_first_time);
    assert_eq!(status.missing_fields, vec!["birth_date".to_string()]);
    assert!(!status.can_submit_works);
}

#[tokio::test]
async fn test_complete_profile_reloads_from_server() {
    let mut server = mockito::Server::new_async().await;
    let complete = server
        .mock("PUT", "/api/users/me/complete-profile")
        .match_body(Matcher::PartialJson(serde_json::json!({"birth_date": "1985-04-12"})))
        .with_status(200)
        .with_body(r#"{"message": "Hoàn thiện hồ sơ thành công"}"#)
        .create_async()
        .await;
    let me = server
        .mock("GET", "/api/users/me")
        .with_status(200)
        .with_body(profile_json("Nguyễn Văn A"))
        .create_async()
        .await;

    let t = signed_in_portal(&server.url(), "tok-13", &researcher());
    let current: hskh_portal::models::UserProfile =
        serde_json::from_str(&profile_json("Nguyễn Văn A")).unwrap();
    let profile = t
        .portal
        .complete_profile(&ProfileForm::from_profile(&current))
        .await
        .unwrap();

    complete.assert_async().await;
    me.assert_async().await;
    assert_eq!(profile, Some(current));
}

/// Backend that answers one request only after `release` fires.
/// `received` fires once the request has arrived.
async fn held_backend(body: String) -> (String, oneshot::Receiver<()>, oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let (received_tx, received_rx) = oneshot::channel();
    let (release_tx, release_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                return;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let _ = received_tx.send(());
        let _ = release_rx.await;
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    });

    (url, received_rx, release_tx)
}

#[tokio::test]
async fn test_response_superseded_by_update_is_discarded() {
    let (url, received, release) = held_backend(profile_json("Tên cũ")).await;
    let t = signed_in_portal(&url, "tok-13", &researcher());

    let profile = Arc::clone(&t.portal.profile);
    let in_flight = tokio::spawn(async move { profile.fetch(true).await });
    received.await.unwrap();

    let newer: UserProfile = serde_json::from_str(&profile_json("Tên mới")).unwrap();
    t.portal.profile.update(newer.clone());
    release.send(()).unwrap();

    assert_eq!(in_flight.await.unwrap(), None);
    let snapshot = t.portal.profile.snapshot();
    assert_eq!(snapshot.profile, Some(newer.clone()));
    assert!(!snapshot.is_loading);
    assert_eq!(t.portal.profile.fetch(false).await, Some(newer), "cache keeps the newer value");
}

#[tokio::test]
async fn test_response_after_clear_is_discarded() {
    let (url, received, release) = held_backend(profile_json("Nguyễn Văn A")).await;
    let t = signed_in_portal(&url, "tok-13", &researcher());

    let profile = Arc::clone(&t.portal.profile);
    let in_flight = tokio::spawn(async move { profile.fetch(true).await });
    received.await.unwrap();

    t.portal.profile.clear();
    release.send(()).unwrap();

    assert_eq!(in_flight.await.unwrap(), None);
    assert_eq!(t.portal.profile.snapshot().profile, None);
    assert!(t.store.get(keys::PROFILE_CACHE).is_none());
}

async fn mock_user_login(server: &mut mockito::ServerGuard) {
    server
        .mock("POST", "/api/users/login")
        .with_status(200)
        .with_body(r#"{"access_token": "tok-13", "token_type": "bearer", "role": "user"}"#)
        .create_async()
        .await;
    server
        .mock("POST", "/api/users/logout")
        .with_status(200)
        .create_async()
        .await;
    server
        .mock("GET", "/api/users/me")
        .with_status(200)
        .with_body(profile_json("Nguyễn Văn A"))
        .create_async()
        .await;
}

#[tokio::test]
async fn test_same_user_relogin_after_logout_loads_profile() {
    let mut server = mockito::Server::new_async().await;
    mock_user_login(&mut server).await;

    let t = signed_in_portal(&server.url(), "tok-13", &researcher());
    t.portal.profile.sync_with_auth().await;
    assert!(t.portal.profile.snapshot().profile.is_some());

    t.portal.logout().await;
    assert_eq!(t.portal.profile.snapshot().profile, None);

    t.portal
        .login(&Credentials::new("nguyen.van.a@example.edu.vn", "matkhau123"))
        .await
        .unwrap();

    assert_eq!(
        t.portal.profile.snapshot().profile.map(|p| p.id),
        Some(13),
        "profile should load again for the same user"
    );
}

#[tokio::test]
async fn test_same_user_relogin_after_expiry_loads_profile() {
    let mut server = mockito::Server::new_async().await;
    mock_user_login(&mut server).await;

    let t = signed_in_portal(&server.url(), "tok-13", &researcher());
    t.portal.profile.sync_with_auth().await;
    assert!(t.portal.profile.snapshot().profile.is_some());

    t.portal.api.sessions().clear();
    t.portal.handle_session_event(SessionEvent::Expired);
    assert_eq!(t.portal.profile.snapshot().profile, None);

    t.portal
        .login(&Credentials::new("nguyen.van.a@example.edu.vn", "matkhau123"))
        .await
        .unwrap();

    assert_eq!(t.portal.profile.snapshot().profile.map(|p| p.id), Some(13));
}

#[tokio::test]
async fn test_update_outside_user_session_is_ignored() {
    let t = signed_in_portal(common::UNREACHABLE, "tok", &admin());
    let profile: UserProfile = serde_json::from_str(&profile_json("Nguyễn Văn A")).unwrap();

    t.portal.profile.update(profile);

    assert_eq!(t.portal.profile.snapshot().profile, None);
    assert!(t.store.get(keys::PROFILE_CACHE).is_none());
}
