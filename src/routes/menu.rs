// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sidebar menus per role.

use crate::models::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub path: &'static str,
}

const ADMIN_MENU: &[MenuItem] = &[
    MenuItem {
        label: "Thống kê",
        path: "/dashboard",
    },
    MenuItem {
        label: "Kiểm duyệt hồ sơ",
        path: "/analytics",
    },
    MenuItem {
        label: "Quản lý tài khoản",
        path: "/quan-ly-tai-khoan",
    },
];

const USER_MENU: &[MenuItem] = &[
    MenuItem {
        label: "Hồ sơ cá nhân",
        path: "/ho-so-ca-nhan",
    },
    MenuItem {
        label: "Quản lý công trình khoa học",
        path: "/cong-trinh-khoa-hoc",
    },
];

pub fn menu_for(role: Role) -> &'static [MenuItem] {
    match role {
        Role::Admin => ADMIN_MENU,
        Role::User => USER_MENU,
    }
}
