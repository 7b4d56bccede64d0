// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};

use crate::role::Role;

/// An authenticated account known to the remote backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub avatar_url: Option<String>,
}

/// A pseudo-identity created by a "local signup", persisted only in local storage.
///
/// Local identities unlock member-only content for the current browser but are never known to the
/// remote backend and carry no role.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalIdentity {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: u64,
}

/// The actor all content visibility and edit checks are evaluated against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Viewer {
    Anonymous,
    Local(LocalIdentity),
    Authenticated(User),
}

/// Result of resolving the active viewer from the two possible identity sources.
///
/// `stale_local` is true when a local identity was present alongside a real user. The caller must
/// clear the persisted local identity in that case, its state is not consulted for any check.
#[derive(Clone, Debug)]
pub struct Resolution {
    pub viewer: Viewer,
    pub stale_local: bool,
}

impl Viewer {
    /// Resolve the active viewer. A real authenticated user strictly wins over a local
    /// pseudo-identity, the two are never merged.
    pub fn resolve(auth_user: Option<User>, local: Option<LocalIdentity>) -> Resolution {
        match (auth_user, local) {
            (Some(user), local) => Resolution {
                viewer: Viewer::Authenticated(user),
                stale_local: local.is_some(),
            },
            (None, Some(local)) => Resolution {
                viewer: Viewer::Local(local),
                stale_local: false,
            },
            (None, None) => Resolution {
                viewer: Viewer::Anonymous,
                stale_local: false,
            },
        }
    }

    /// Return true when any identity is active, local pseudo-identities included.
    pub fn is_signed_in(&self) -> bool {
        !matches!(self, Viewer::Anonymous)
    }

    /// Return true only for a real authenticated user.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Viewer::Authenticated(_))
    }

    /// Return the id of the active identity.
    pub fn id(&self) -> Option<&str> {
        match self {
            Viewer::Anonymous => None,
            Viewer::Local(local) => Some(&local.id),
            Viewer::Authenticated(user) => Some(&user.id),
        }
    }

    /// Return the role of the active identity. Only real users carry a role.
    pub fn role(&self) -> Option<Role> {
        match self {
            Viewer::Authenticated(user) => Some(user.role),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::identity::{LocalIdentity, User, Viewer};
    use crate::role::Role;

    fn test_user(role: Role) -> User {
        User {
            id: "user-1".to_string(),
            email: "mika@studio.test".to_string(),
            name: "Mika".to_string(),
            role,
            avatar_url: None,
        }
    }

    fn test_local() -> LocalIdentity {
        LocalIdentity {
            id: "local-17".to_string(),
            name: "Sam".to_string(),
            email: "sam@studio.test".to_string(),
            created_at: 1700000000000,
        }
    }

    #[test]
    fn real_user_wins_over_local_identity() {
        let resolution = Viewer::resolve(Some(test_user(Role::Subscriber)), Some(test_local()));

        assert!(resolution.viewer.is_authenticated());
        assert_eq!(resolution.viewer.id(), Some("user-1"));

        // The local identity must be cleared by the caller, never consulted.
        assert!(resolution.stale_local);
    }

    #[test]
    fn local_identity_applies_when_no_user_present() {
        let resolution = Viewer::resolve(None, Some(test_local()));

        assert!(resolution.viewer.is_signed_in());
        assert!(!resolution.viewer.is_authenticated());
        assert_eq!(resolution.viewer.id(), Some("local-17"));
        assert_eq!(resolution.viewer.role(), None);
        assert!(!resolution.stale_local);
    }

    #[test]
    fn anonymous_when_no_identity_present() {
        let resolution = Viewer::resolve(None, None);

        assert_eq!(resolution.viewer, Viewer::Anonymous);
        assert!(!resolution.viewer.is_signed_in());
        assert_eq!(resolution.viewer.id(), None);
    }
}
