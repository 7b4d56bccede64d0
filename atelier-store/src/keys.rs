// SPDX-License-Identifier: MIT OR Apache-2.0

//! Well-known keys of the local store.

/// Locally-created content items, in creation order.
pub const CUSTOM_CONTENT: &str = "atelier.content.custom";

/// Local replacements of canonical content items, keyed by id.
pub const EDITED_CONTENT: &str = "atelier.content.edited";

/// The favorites ledger.
pub const FAVORITES: &str = "atelier.favorites";

/// Favorites recorded before viewer scoping existed. Drained once into the scoped ledger on
/// first login, then removed.
pub const LEGACY_FAVORITES: &str = "atelier.favorites.legacy";

/// The local signup pseudo-identity.
pub const LOCAL_IDENTITY: &str = "atelier.identity.local";

/// Cached profile of the signed-in user.
pub const PROFILE: &str = "atelier.profile";
