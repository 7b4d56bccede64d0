// SPDX-License-Identifier: MIT OR Apache-2.0

use std::error::Error;

use atelier_core::content::{ContentItem, ContentType};
use atelier_core::identity::User;
use atelier_store::favorites::FavoriteEntry;

/// Interface to the remote, per-viewer content store.
///
/// Upserts are keyed by the stable content id, so retrying an upsert is convergent rather than
/// conflicting. Implementations map these calls onto their table-per-content-type backend.
pub trait RemoteStore {
    type Error: Error;

    /// Insert or replace a content item in the viewer's remote collection.
    fn upsert_content(
        &self,
        viewer_id: &str,
        item: &ContentItem,
    ) -> impl Future<Output = Result<(), Self::Error>>;

    /// Query whether the viewer has any remote content of the given type.
    fn has_content(
        &self,
        viewer_id: &str,
        content_type: ContentType,
    ) -> impl Future<Output = Result<bool, Self::Error>>;

    /// Insert or replace a favorite entry in the viewer's remote collection.
    fn upsert_favorite(
        &self,
        viewer_id: &str,
        entry: &FavoriteEntry,
    ) -> impl Future<Output = Result<(), Self::Error>>;

    /// Query whether the viewer has any remote favorites.
    fn has_favorites(&self, viewer_id: &str) -> impl Future<Output = Result<bool, Self::Error>>;
}

/// The authentication signal the migration trigger is derived from.
pub trait AuthSession {
    /// The currently authenticated user, if any.
    fn current_user(&self) -> Option<User>;
}
