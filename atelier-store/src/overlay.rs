// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeMap;

use atelier_core::content::{ContentItem, ContentType};
use tracing::warn;

use crate::keys;
use crate::token::IdGenerator;
use crate::traits::{LocalStore, StorageError};

type ContentKey = (ContentType, String);

/// Merges canonical content with locally-edited and locally-created items.
///
/// The store holds two collections: the "edited" map of per-id replacements for canonical items
/// and the "custom" list of wholly new local items in creation order. The effective content for
/// an id is the replacement when one exists, the canonical item otherwise. Custom items are
/// served through the same lookup path and can themselves be edited.
///
/// Every mutation persists the full snapshot of both collections to the local store. When a
/// write fails the in-memory state is kept, it stays the source of truth for the running
/// session.
#[derive(Debug)]
pub struct OverlayStore<S> {
    store: S,
    edited: BTreeMap<ContentKey, ContentItem>,
    custom: Vec<ContentItem>,
    ids: IdGenerator,
}

impl<S> OverlayStore<S>
where
    S: LocalStore,
{
    /// Load the overlay from the local store.
    ///
    /// Absent keys are empty collections. A corrupt blob is ignored with a warning, it never
    /// fails the caller.
    pub fn load(store: S) -> Self {
        Self::load_with_ids(store, IdGenerator::new())
    }

    pub fn load_with_ids(store: S, ids: IdGenerator) -> Self {
        let custom = read_items(&store, keys::CUSTOM_CONTENT);
        let edited = read_items(&store, keys::EDITED_CONTENT)
            .into_iter()
            .map(|item| ((item.content_type(), item.id().to_string()), item))
            .collect();

        Self {
            store,
            edited,
            custom,
            ids,
        }
    }

    /// Return the effective content item for an id: the local replacement when one exists, the
    /// canonical item otherwise.
    ///
    /// A replacement whose id has no canonical or custom counterpart is ignored, nothing is
    /// rendered for it.
    pub fn get_effective(
        &self,
        content_type: ContentType,
        id: &str,
        canonical: impl Fn(&str) -> Option<ContentItem>,
    ) -> Option<ContentItem> {
        let canonical_item = canonical(id);

        if let Some(replacement) = self.edited.get(&(content_type, id.to_string())) {
            if canonical_item.is_some() || self.is_custom(content_type, id) {
                return Some(replacement.clone());
            }

            warn!(%content_type, id, "ignoring overlay entry without canonical or custom counterpart");
            return None;
        }

        canonical_item.or_else(|| {
            self.custom
                .iter()
                .find(|item| item.content_type() == content_type && item.id() == id)
                .cloned()
        })
    }

    /// Return the effective content list for one section: canonical items in their declared
    /// order, followed by custom items in creation order, each passed through the overlay.
    pub fn effective_list(
        &self,
        content_type: ContentType,
        canonical: &[ContentItem],
    ) -> Vec<ContentItem> {
        let mut items: Vec<ContentItem> = canonical
            .iter()
            .filter(|item| item.content_type() == content_type)
            .map(|item| self.replacement_or(item))
            .collect();

        items.extend(
            self.custom
                .iter()
                .filter(|item| item.content_type() == content_type)
                .map(|item| self.replacement_or(item)),
        );

        items
    }

    /// Upsert a local replacement for a content item, keyed by its id.
    ///
    /// Idempotent: applying the same edit twice yields the same overlay state.
    pub fn apply_edit(&mut self, item: ContentItem) -> Result<(), StorageError> {
        self.edited
            .insert((item.content_type(), item.id().to_string()), item);
        self.persist()
    }

    /// Create a wholly new local content item.
    ///
    /// The id of the passed item is replaced by a minted one, disjoint from all canonical and
    /// previously minted ids. Returns the stored item.
    pub fn create_custom(&mut self, item: ContentItem) -> Result<ContentItem, StorageError> {
        let item = item.with_id(self.ids.mint());
        self.custom.push(item.clone());
        self.persist()?;
        Ok(item)
    }

    /// Delete a locally-created item, along with any replacement recorded for it.
    ///
    /// Returns `true` when the removal occurred and `false` when no custom item matched.
    pub fn delete_custom(
        &mut self,
        content_type: ContentType,
        id: &str,
    ) -> Result<bool, StorageError> {
        let before = self.custom.len();
        self.custom
            .retain(|item| !(item.content_type() == content_type && item.id() == id));
        let removed = self.custom.len() < before;

        self.edited.remove(&(content_type, id.to_string()));

        if removed {
            self.persist()?;
        }
        Ok(removed)
    }

    /// All local items of one section in their effective version: custom items first (in
    /// creation order), then edited canonical items. This is what migration drains.
    pub fn local_items(&self, content_type: ContentType) -> Vec<ContentItem> {
        let mut items: Vec<ContentItem> = self
            .custom
            .iter()
            .filter(|item| item.content_type() == content_type)
            .map(|item| self.replacement_or(item))
            .collect();

        items.extend(
            self.edited
                .iter()
                .filter(|((item_type, id), _)| {
                    *item_type == content_type && !self.is_custom(*item_type, id)
                })
                .map(|(_, item)| item.clone()),
        );

        items
    }

    /// Remove all local items of one section and persist the shrunk snapshot.
    pub fn purge(&mut self, content_type: ContentType) -> Result<(), StorageError> {
        self.custom.retain(|item| item.content_type() != content_type);
        self.edited.retain(|(item_type, _), _| *item_type != content_type);
        self.persist()
    }

    /// Return true when no local edits or creations exist.
    pub fn is_empty(&self) -> bool {
        self.custom.is_empty() && self.edited.is_empty()
    }

    pub fn custom_items(&self) -> &[ContentItem] {
        &self.custom
    }

    fn is_custom(&self, content_type: ContentType, id: &str) -> bool {
        self.custom
            .iter()
            .any(|item| item.content_type() == content_type && item.id() == id)
    }

    fn replacement_or(&self, item: &ContentItem) -> ContentItem {
        self.edited
            .get(&(item.content_type(), item.id().to_string()))
            .unwrap_or(item)
            .clone()
    }

    fn persist(&self) -> Result<(), StorageError> {
        let custom = serde_json::to_string(&self.custom)?;
        let edited: Vec<&ContentItem> = self.edited.values().collect();
        let edited = serde_json::to_string(&edited)?;

        let result = self
            .store
            .set(keys::CUSTOM_CONTENT, &custom)
            .and_then(|_| self.store.set(keys::EDITED_CONTENT, &edited));

        if let Err(err) = &result {
            // In-memory state stays authoritative for the session.
            warn!(%err, "failed to persist content overlay");
        }

        result
    }
}

fn read_items<S>(store: &S, key: &str) -> Vec<ContentItem>
where
    S: LocalStore,
{
    let blob = match store.get(key) {
        Ok(blob) => blob,
        Err(err) => {
            warn!(key, %err, "failed to read local store");
            return Vec::new();
        }
    };

    match blob {
        Some(blob) => match serde_json::from_str(&blob) {
            Ok(items) => items,
            Err(err) => {
                warn!(key, %err, "ignoring corrupt content blob");
                Vec::new()
            }
        },
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use atelier_core::content::{AccessLevel, ContentItem, ContentType, Gradient, Project};

    use crate::memory::MemoryStore;
    use crate::overlay::OverlayStore;
    use crate::token::IdGenerator;
    use crate::traits::{LocalStore, StorageError};

    fn project(id: &str, title: &str) -> ContentItem {
        ContentItem::Project(Project {
            id: id.to_string(),
            title: title.to_string(),
            summary: String::new(),
            client: "Studio".to_string(),
            tags: vec![],
            access_level: AccessLevel::Public,
            hero_image: None,
        })
    }

    fn gradient(id: &str, name: &str) -> ContentItem {
        ContentItem::Gradient(Gradient {
            id: id.to_string(),
            name: name.to_string(),
            stops: vec!["#0f2027".to_string(), "#2c5364".to_string()],
            angle: 90,
            access_level: AccessLevel::Public,
        })
    }

    fn canonical_projects() -> Vec<ContentItem> {
        vec![project("p1", "Branding refresh"), project("p2", "App redesign")]
    }

    fn lookup(items: Vec<ContentItem>) -> impl Fn(&str) -> Option<ContentItem> {
        move |id| items.iter().find(|item| item.id() == id).cloned()
    }

    #[test]
    fn overlay_wins_over_canonical() {
        let mut overlay = OverlayStore::load(MemoryStore::new());

        overlay.apply_edit(project("p1", "New Title")).unwrap();

        let effective = overlay
            .get_effective(ContentType::Project, "p1", lookup(canonical_projects()))
            .unwrap();
        assert_eq!(effective.title(), "New Title");

        // Untouched canonical items pass through unchanged.
        let untouched = overlay
            .get_effective(ContentType::Project, "p2", lookup(canonical_projects()))
            .unwrap();
        assert_eq!(untouched.title(), "App redesign");
    }

    #[test]
    fn apply_edit_is_idempotent() {
        let store = MemoryStore::new();
        let mut overlay = OverlayStore::load(store.clone());

        overlay.apply_edit(project("p1", "New Title")).unwrap();
        let snapshot = store.get(crate::keys::EDITED_CONTENT).unwrap();

        overlay.apply_edit(project("p1", "New Title")).unwrap();
        assert_eq!(store.get(crate::keys::EDITED_CONTENT).unwrap(), snapshot);

        let list = overlay.effective_list(ContentType::Project, &canonical_projects());
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn custom_items_are_immediately_visible() {
        let mut overlay =
            OverlayStore::load_with_ids(MemoryStore::new(), IdGenerator::seeded(1700000000000));

        let created = overlay.create_custom(gradient("ignored", "Dawn")).unwrap();
        assert!(created.id().starts_with("local-"));

        // Visible through the same effective-lookup path as canonical content.
        let effective = overlay
            .get_effective(ContentType::Gradient, created.id(), |_| None)
            .unwrap();
        assert_eq!(effective.title(), "Dawn");
    }

    #[test]
    fn minted_ids_do_not_collide() {
        let mut overlay =
            OverlayStore::load_with_ids(MemoryStore::new(), IdGenerator::seeded(1700000000000));

        let first = overlay.create_custom(gradient("x", "Dawn")).unwrap();
        let second = overlay.create_custom(gradient("x", "Dusk")).unwrap();

        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn delete_custom_removes_item_and_replacement() {
        let mut overlay = OverlayStore::load(MemoryStore::new());

        let created = overlay.create_custom(gradient("x", "Dawn")).unwrap();
        let id = created.id().to_string();

        // Edit the custom item, then delete it: both records must go.
        overlay
            .apply_edit(gradient(&id, "Dawn, revised"))
            .unwrap();
        assert!(overlay.delete_custom(ContentType::Gradient, &id).unwrap());

        assert!(overlay
            .get_effective(ContentType::Gradient, &id, |_| None)
            .is_none());
        assert!(overlay.is_empty());

        // Deleting again reports that nothing was removed.
        assert!(!overlay.delete_custom(ContentType::Gradient, &id).unwrap());
    }

    #[test]
    fn effective_list_keeps_canonical_order_then_creation_order() {
        let mut overlay =
            OverlayStore::load_with_ids(MemoryStore::new(), IdGenerator::seeded(1700000000000));

        overlay.apply_edit(project("p2", "App redesign v2")).unwrap();
        let first = overlay.create_custom(project("x", "Side quest")).unwrap();
        let second = overlay.create_custom(project("x", "Later quest")).unwrap();

        let list = overlay.effective_list(ContentType::Project, &canonical_projects());
        let titles: Vec<_> = list.iter().map(|item| item.title()).collect();

        assert_eq!(
            titles,
            vec!["Branding refresh", "App redesign v2", "Side quest", "Later quest"]
        );
        assert_eq!(list[2].id(), first.id());
        assert_eq!(list[3].id(), second.id());
    }

    #[test]
    fn orphaned_overlay_entries_render_nothing() {
        let mut overlay = OverlayStore::load(MemoryStore::new());

        // A replacement for an id no canonical or custom item carries.
        overlay.apply_edit(project("ghost", "Not here")).unwrap();

        assert!(overlay
            .get_effective(ContentType::Project, "ghost", |_| None)
            .is_none());
    }

    #[test]
    fn state_survives_a_reload() {
        let store = MemoryStore::new();

        let mut overlay = OverlayStore::load(store.clone());
        overlay.apply_edit(project("p1", "New Title")).unwrap();
        let created = overlay.create_custom(gradient("x", "Dawn")).unwrap();

        let reloaded = OverlayStore::load(store);
        assert_eq!(
            reloaded
                .get_effective(ContentType::Project, "p1", lookup(canonical_projects()))
                .unwrap()
                .title(),
            "New Title"
        );
        assert_eq!(
            reloaded
                .get_effective(ContentType::Gradient, created.id(), |_| None)
                .unwrap()
                .title(),
            "Dawn"
        );
    }

    #[test]
    fn quota_failure_keeps_in_memory_state() {
        // Too small for any snapshot write.
        let mut overlay = OverlayStore::load(MemoryStore::with_capacity(8));

        let result = overlay.apply_edit(project("p1", "New Title"));
        assert!(matches!(result, Err(StorageError::QuotaExceeded(_))));

        // The edit is still served for the rest of the session.
        let effective = overlay
            .get_effective(ContentType::Project, "p1", lookup(canonical_projects()))
            .unwrap();
        assert_eq!(effective.title(), "New Title");
    }

    #[test]
    fn purge_clears_one_section_only() {
        let mut overlay = OverlayStore::load(MemoryStore::new());

        overlay.apply_edit(project("p1", "New Title")).unwrap();
        overlay.create_custom(gradient("x", "Dawn")).unwrap();

        overlay.purge(ContentType::Project).unwrap();

        assert!(overlay.local_items(ContentType::Project).is_empty());
        assert_eq!(overlay.local_items(ContentType::Gradient).len(), 1);
    }
}
