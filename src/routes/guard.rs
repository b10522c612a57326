// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route authorization guard.
//!
//! | loading | require_auth | user | role allowed | decision            |
//! |---------|--------------|------|--------------|---------------------|
//! | yes     | any          | any  | any          | Loading             |
//! | no      | yes          | none | -            | Redirect `/login`   |
//! | no      | no           | some | -            | Redirect to landing |
//! | no      | yes          | some | no           | Redirect to landing |
//! | no      | otherwise    |      |              | Render              |

use super::LOGIN_PATH;
use crate::models::{Role, User};

/// Who may see a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access {
    pub require_auth: bool,
    /// Empty means any signed-in role.
    pub allowed_roles: &'static [Role],
}

impl Access {
    /// Only for signed-out visitors (login screen).
    pub const PUBLIC_ONLY: Access = Access {
        require_auth: false,
        allowed_roles: &[],
    };

    pub const AUTHENTICATED: Access = Access {
        require_auth: true,
        allowed_roles: &[],
    };

    pub const fn roles(allowed_roles: &'static [Role]) -> Access {
        Access {
            require_auth: true,
            allowed_roles,
        }
    }

    fn permits(&self, role: Role) -> bool {
        self.allowed_roles.is_empty() || self.allowed_roles.contains(&role)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub to: String,
    /// Originally requested location, for post-login return.
    pub from: Option<String>,
}

impl Redirect {
    pub fn to(path: &str) -> Self {
        Self {
            to: path.to_string(),
            from: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Auth state not known yet; show a placeholder.
    Loading,
    Render,
    Redirect(Redirect),
}

impl GuardDecision {
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            GuardDecision::Redirect(r) => Some(&r.to),
            _ => None,
        }
    }
}

/// Decide what happens when `requested` is navigated to.
pub fn authorize(
    user: Option<&User>,
    is_loading: bool,
    access: &Access,
    requested: &str,
) -> GuardDecision {
    if is_loading {
        return GuardDecision::Loading;
    }

    match (access.require_auth, user) {
        (true, None) => GuardDecision::Redirect(Redirect {
            to: LOGIN_PATH.to_string(),
            from: Some(requested.to_string()),
        }),
        (false, Some(user)) => GuardDecision::Redirect(Redirect::to(user.role.default_route())),
        (true, Some(user)) if !access.permits(user.role) => {
            tracing::debug!(path = requested, role = %user.role, "Role not permitted, redirecting");
            GuardDecision::Redirect(Redirect::to(user.role.default_route()))
        }
        _ => GuardDecision::Render,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        User {
            id: "1".into(),
            email: "x@example.com".into(),
            name: "X".into(),
            role,
            avatar: None,
        }
    }

    const ADMIN_ONLY: Access = Access::roles(&[Role::Admin]);
    const USER_ONLY: Access = Access::roles(&[Role::User]);

    #[test]
    fn test_loading_never_redirects() {
        for access in [Access::PUBLIC_ONLY, ADMIN_ONLY, Access::AUTHENTICATED] {
            assert_eq!(authorize(None, true, &access, "/x"), GuardDecision::Loading);
            let u = user(Role::User);
            assert_eq!(
                authorize(Some(&u), true, &access, "/x"),
                GuardDecision::Loading
            );
        }
    }

    #[test]
    fn test_anonymous_to_protected_redirects_to_login() {
        let decision = authorize(None, false, &ADMIN_ONLY, "/dashboard");
        assert_eq!(
            decision,
            GuardDecision::Redirect(Redirect {
                to: "/login".into(),
                from: Some("/dashboard".into()),
            })
        );
    }

    #[test]
    fn test_authenticated_on_public_only_goes_to_landing() {
        let admin = user(Role::Admin);
        assert_eq!(
            authorize(Some(&admin), false, &Access::PUBLIC_ONLY, "/login").redirect_target(),
            Some("/dashboard")
        );
        let u = user(Role::User);
        assert_eq!(
            authorize(Some(&u), false, &Access::PUBLIC_ONLY, "/login").redirect_target(),
            Some("/ho-so-ca-nhan")
        );
    }

    #[test]
    fn test_role_mismatch_goes_to_landing() {
        let u = user(Role::User);
        assert_eq!(
            authorize(Some(&u), false, &ADMIN_ONLY, "/dashboard"),
            GuardDecision::Redirect(Redirect::to("/ho-so-ca-nhan"))
        );
        let admin = user(Role::Admin);
        assert_eq!(
            authorize(Some(&admin), false, &USER_ONLY, "/cong-trinh-khoa-hoc").redirect_target(),
            Some("/dashboard")
        );
    }

    #[test]
    fn test_render_cases() {
        assert_eq!(
            authorize(None, false, &Access::PUBLIC_ONLY, "/login"),
            GuardDecision::Render
        );
        let admin = user(Role::Admin);
        assert_eq!(
            authorize(Some(&admin), false, &ADMIN_ONLY, "/dashboard"),
            GuardDecision::Render
        );
        let u = user(Role::User);
        assert_eq!(
            authorize(Some(&u), false, &Access::AUTHENTICATED, "/complete-profile"),
            GuardDecision::Render
        );
    }
}
