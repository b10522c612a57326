// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Screen routes, role menus and the authorization guard.

pub mod guard;
pub mod menu;

pub use guard::{authorize, Access, GuardDecision, Redirect};
pub use menu::{menu_for, MenuItem};

use crate::models::Role;
use crate::state::AuthSnapshot;

pub const ROOT_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Root,
    Login,
    CompleteProfile,
    Dashboard,
    Analytics,
    AccountManagement,
    PersonalProfile,
    ScientificWorks,
}

#[derive(Debug, Clone, Copy)]
pub struct RouteSpec {
    pub path: &'static str,
    pub screen: Screen,
    pub access: Access,
}

const ADMIN: Access = Access::roles(&[Role::Admin]);
const USER: Access = Access::roles(&[Role::User]);
const ANY_ROLE: Access = Access::roles(&[Role::Admin, Role::User]);

/// All known screens.
pub const ROUTES: &[RouteSpec] = &[
    RouteSpec {
        path: ROOT_PATH,
        screen: Screen::Root,
        access: Access::AUTHENTICATED,
    },
    RouteSpec {
        path: LOGIN_PATH,
        screen: Screen::Login,
        access: Access::PUBLIC_ONLY,
    },
    RouteSpec {
        path: "/complete-profile",
        screen: Screen::CompleteProfile,
        access: ANY_ROLE,
    },
    RouteSpec {
        path: "/dashboard",
        screen: Screen::Dashboard,
        access: ADMIN,
    },
    RouteSpec {
        path: "/analytics",
        screen: Screen::Analytics,
        access: ADMIN,
    },
    RouteSpec {
        path: "/quan-ly-tai-khoan",
        screen: Screen::AccountManagement,
        access: ADMIN,
    },
    RouteSpec {
        path: "/ho-so-ca-nhan",
        screen: Screen::PersonalProfile,
        access: USER,
    },
    RouteSpec {
        path: "/cong-trinh-khoa-hoc",
        screen: Screen::ScientificWorks,
        access: USER,
    },
];

/// Look up a screen by path. Query string and trailing slash are ignored.
pub fn resolve(path: &str) -> Option<&'static RouteSpec> {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let trimmed = path.trim_end_matches('/');
    let path = if trimmed.is_empty() { ROOT_PATH } else { trimmed };
    ROUTES.iter().find(|r| r.path == path)
}

/// `/`: send the visitor to login or to their role's landing screen.
pub fn root_redirect(auth: &AuthSnapshot) -> GuardDecision {
    if auth.is_loading {
        return GuardDecision::Loading;
    }
    match &auth.user {
        None => GuardDecision::Redirect(Redirect::to(LOGIN_PATH)),
        Some(user) => GuardDecision::Redirect(Redirect::to(user.role.default_route())),
    }
}

/// Evaluate navigation to `path` against the current auth state.
/// Unknown paths go back to `/`.
pub fn navigate(path: &str, auth: &AuthSnapshot) -> GuardDecision {
    match resolve(path) {
        Some(RouteSpec {
            screen: Screen::Root,
            ..
        }) => root_redirect(auth),
        Some(route) => authorize(auth.user.as_ref(), auth.is_loading, &route.access, path),
        None => GuardDecision::Redirect(Redirect::to(ROOT_PATH)),
    }
}
