// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The four roles which can be assigned to an account. Greater roles are assumed to also contain
/// all capabilities of the lower ones.
///
/// Accounts start out as `Subscriber` and can only move up from there (via an approved role
/// request), never down.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Default role for every new account.
    #[default]
    Subscriber,

    /// Permission to edit and create content.
    Editor,

    /// Permission to manage accounts and review role requests.
    Admin,

    /// Permission over everything, including other admins.
    SuperAdmin,
}

/// Capabilities derived from a role.
///
/// Capability sets are monotonic over the role ordering: a higher role never loses a capability a
/// lower role holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    pub can_edit: bool,
    pub can_manage_users: bool,
    pub can_view_private_content: bool,
}

impl Role {
    /// Derive the capability set of this role.
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            can_edit: *self >= Role::Editor,
            can_manage_users: *self >= Role::Admin,
            can_view_private_content: true,
        }
    }

    /// Role has permission to edit and create content.
    pub fn can_edit(&self) -> bool {
        self.capabilities().can_edit
    }

    /// Role has permission to manage accounts and review role requests.
    pub fn can_manage_users(&self) -> bool {
        self.capabilities().can_manage_users
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Subscriber => "subscriber",
            Role::Editor => "editor",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        };

        write!(f, "{s}")
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "subscriber" => Ok(Role::Subscriber),
            "editor" => Ok(Role::Editor),
            "admin" => Ok(Role::Admin),
            "super_admin" => Ok(Role::SuperAdmin),
            unknown => Err(RoleError::UnknownRole(unknown.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoleError {
    /// Role strings which are not part of the known set are rejected at the boundary, they are
    /// never silently mapped onto a lower role.
    #[error("unknown role: {0}")]
    UnknownRole(String),
}
