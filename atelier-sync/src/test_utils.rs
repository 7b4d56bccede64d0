// SPDX-License-Identifier: MIT OR Apache-2.0

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use atelier_core::content::{ContentItem, ContentType};
use atelier_core::identity::User;
use atelier_core::role::Role;
use atelier_store::favorites::FavoriteEntry;
use thiserror::Error;

use crate::migration::Collection;
use crate::traits::{AuthSession, RemoteStore};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct RemoteError(pub String);

/// In-memory remote store.
///
/// Nothing outlives the process, use this in development or test contexts. Individual
/// collections can be scripted to fail, which exercises the per-collection error isolation of
/// the migration engine.
#[derive(Debug, Default)]
pub struct MemoryRemote {
    content: RefCell<HashMap<(String, ContentType, String), ContentItem>>,
    favorites: RefCell<HashMap<(String, String, ContentType), FavoriteEntry>>,
    failing: RefCell<HashSet<Collection>>,
    content_upserts: Cell<usize>,
    favorite_upserts: Cell<usize>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script all upserts of one collection to fail.
    pub fn fail(&self, collection: Collection) {
        self.failing.borrow_mut().insert(collection);
    }

    /// Let a previously failing collection succeed again.
    pub fn restore(&self, collection: Collection) {
        self.failing.borrow_mut().remove(&collection);
    }

    /// Seed a remote content record directly, bypassing the failure script.
    pub fn seed_content(&self, viewer_id: &str, item: ContentItem) {
        self.content.borrow_mut().insert(
            (
                viewer_id.to_string(),
                item.content_type(),
                item.id().to_string(),
            ),
            item,
        );
    }

    pub fn content_count(&self, viewer_id: &str, content_type: ContentType) -> usize {
        self.content
            .borrow()
            .keys()
            .filter(|(viewer, item_type, _)| viewer == viewer_id && *item_type == content_type)
            .count()
    }

    pub fn favorites_count(&self, viewer_id: &str) -> usize {
        self.favorites
            .borrow()
            .keys()
            .filter(|(viewer, _, _)| viewer == viewer_id)
            .count()
    }

    /// Total number of content upsert calls, duplicates included.
    pub fn content_upsert_calls(&self) -> usize {
        self.content_upserts.get()
    }

    fn check(&self, collection: Collection) -> Result<(), RemoteError> {
        if self.failing.borrow().contains(&collection) {
            return Err(RemoteError(format!("{collection} write rejected")));
        }
        Ok(())
    }
}

impl RemoteStore for MemoryRemote {
    type Error = RemoteError;

    async fn upsert_content(&self, viewer_id: &str, item: &ContentItem) -> Result<(), RemoteError> {
        let collection = match item.content_type() {
            ContentType::Project => Collection::Projects,
            ContentType::BlogPost => Collection::BlogPosts,
            ContentType::Gradient => Collection::Gradients,
        };
        self.check(collection)?;

        self.content_upserts.set(self.content_upserts.get() + 1);
        self.content.borrow_mut().insert(
            (
                viewer_id.to_string(),
                item.content_type(),
                item.id().to_string(),
            ),
            item.clone(),
        );
        Ok(())
    }

    async fn has_content(
        &self,
        viewer_id: &str,
        content_type: ContentType,
    ) -> Result<bool, RemoteError> {
        Ok(self.content_count(viewer_id, content_type) > 0)
    }

    async fn upsert_favorite(
        &self,
        viewer_id: &str,
        entry: &FavoriteEntry,
    ) -> Result<(), RemoteError> {
        self.check(Collection::Favorites)?;

        self.favorite_upserts.set(self.favorite_upserts.get() + 1);
        self.favorites.borrow_mut().insert(
            (
                viewer_id.to_string(),
                entry.content_id.clone(),
                entry.content_type,
            ),
            entry.clone(),
        );
        Ok(())
    }

    async fn has_favorites(&self, viewer_id: &str) -> Result<bool, RemoteError> {
        Ok(self.favorites_count(viewer_id) > 0)
    }
}

/// Auth session with a fixed answer.
#[derive(Debug, Default)]
pub struct StaticSession {
    user: Option<User>,
}

impl StaticSession {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn logged_in(user: User) -> Self {
        Self { user: Some(user) }
    }
}

impl AuthSession for StaticSession {
    fn current_user(&self) -> Option<User> {
        self.user.clone()
    }
}

/// A subscriber account for tests.
pub fn test_user(id: &str) -> User {
    User {
        id: id.to_string(),
        email: format!("{id}@studio.test"),
        name: "Mika".to_string(),
        role: Role::Subscriber,
        avatar_url: None,
    }
}
