// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use hskh_portal::config::Config;
use hskh_portal::models::{Role, User};
use hskh_portal::storage::{MemoryStore, SessionStore};
use hskh_portal::time_utils::ManualClock;
use hskh_portal::Portal;
use std::sync::Arc;

/// Fixed start time for test clocks.
#[allow(dead_code)]
pub const T0: i64 = 1_760_000_000_000;

/// Address nothing listens on.
#[allow(dead_code)]
pub const UNREACHABLE: &str = "http://127.0.0.1:1";

/// Portal wired to a test backend, with handles to its store and clock.
pub struct TestPortal {
    pub portal: Portal,
    pub store: Arc<MemoryStore>,
    pub clock: ManualClock,
}

/// Create a portal on an empty in-memory store.
#[allow(dead_code)]
pub fn test_portal(base_url: &str) -> TestPortal {
    build(base_url, Arc::new(MemoryStore::new()))
}

/// Create a portal whose store already holds a session for `user`.
#[allow(dead_code)]
pub fn signed_in_portal(base_url: &str, token: &str, user: &User) -> TestPortal {
    let store = Arc::new(MemoryStore::new());
    SessionStore::new(store.clone())
        .set(token, user)
        .expect("seed session");
    build(base_url, store)
}

fn build(base_url: &str, store: Arc<MemoryStore>) -> TestPortal {
    let clock = ManualClock::new(T0);
    let portal = Portal::new(
        Config::for_base_url(base_url),
        store.clone(),
        Arc::new(clock.clone()),
    )
    .expect("portal");
    TestPortal {
        portal,
        store,
        clock,
    }
}

#[allow(dead_code)]
pub fn researcher() -> User {
    User {
        id: "13".to_string(),
        email: "nguyen.van.a@example.edu.vn".to_string(),
        name: "Nguyễn Văn A".to_string(),
        role: Role::User,
        avatar: None,
    }
}

#[allow(dead_code)]
pub fn admin() -> User {
    User {
        id: "1".to_string(),
        email: "admin@example.edu.vn".to_string(),
        name: "Administrator".to_string(),
        role: Role::Admin,
        avatar: None,
    }
}

/// `GET /api/users/me` body for [`researcher`].
#[allow(dead_code)]
pub fn profile_json(full_name: &str) -> String {
    serde_json::json!({
        "id": 13,
        "full_name": full_name,
        "email": "nguyen.van.a@example.edu.vn",
        "phone_number": "0901234567",
        "birth_date": "1985-04-12",
        "avatar_path": null,
        "avatar_url": null,
        "thoi_gian_cong_tac": 12,
        "so_nam_sau_ts": 5,
        "so_gio_giang_chuan": 270,
        "so_hoc_vien_thac_si_huong_dan": 4,
        "so_ncs_tien_si_huong_dan": null,
        "so_de_tai_cap_bo": 1,
        "so_de_tai_cap_co_so": 3,
        "created_at": "2024-09-01T08:00:00"
    })
    .to_string()
}
