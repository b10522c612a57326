// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Screen navigation through the guard for each kind of visitor.

use hskh_portal::routes::{self, GuardDecision, Redirect};
use hskh_portal::state::AuthSnapshot;

mod common;
use common::{admin, researcher, signed_in_portal, test_portal, UNREACHABLE};

#[test]
fn test_anonymous_visitor_sent_to_login_with_return_path() {
    let t = test_portal(UNREACHABLE);

    let decision = t.portal.navigate("/dashboard");

    assert_eq!(
        decision,
        GuardDecision::Redirect(Redirect {
            to: "/login".into(),
            from: Some("/dashboard".into()),
        })
    );
    assert_eq!(t.portal.location().path, "/login");
    assert_eq!(t.portal.location().from.as_deref(), Some("/dashboard"));
}

#[test]
fn test_user_cannot_open_admin_screens() {
    let t = signed_in_portal(UNREACHABLE, "tok-13", &researcher());

    for path in ["/dashboard", "/analytics", "/quan-ly-tai-khoan"] {
        assert_eq!(
            t.portal.navigate(path).redirect_target(),
            Some("/ho-so-ca-nhan"),
            "{} should bounce",
            path
        );
    }
    assert_eq!(t.portal.navigate("/cong-trinh-khoa-hoc"), GuardDecision::Render);
    assert_eq!(t.portal.location().path, "/cong-trinh-khoa-hoc");
}

#[test]
fn test_signed_in_admin_skips_login_screen() {
    let t = signed_in_portal(UNREACHABLE, "tok", &admin());

    assert_eq!(t.portal.navigate("/login").redirect_target(), Some("/dashboard"));
    assert_eq!(t.portal.location().path, "/dashboard");
}

#[test]
fn test_unknown_path_lands_via_root() {
    let t = signed_in_portal(UNREACHABLE, "tok", &admin());

    assert_eq!(t.portal.navigate("/khong-co").redirect_target(), Some("/"));
    assert_eq!(t.portal.navigate("/").redirect_target(), Some("/dashboard"));
}

#[test]
fn test_loading_state_holds_location() {
    let loading = AuthSnapshot::default();
    assert!(loading.is_loading);
    for path in ["/", "/login", "/dashboard", "/ho-so-ca-nhan"] {
        assert_eq!(routes::navigate(path, &loading), GuardDecision::Loading);
    }

    let t = test_portal(UNREACHABLE);
    let before = t.portal.location();
    t.portal.navigator.apply("/dashboard", &GuardDecision::Loading);
    assert_eq!(t.portal.location(), before);
}
