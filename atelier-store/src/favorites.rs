// SPDX-License-Identifier: MIT OR Apache-2.0

use atelier_core::content::ContentType;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::keys;
use crate::token::unix_millis;
use crate::traits::{LocalStore, StorageError};

/// One favorited content item.
///
/// `viewer_id` is `None` for favorites recorded while anonymous. At most one entry exists per
/// `(viewer_id, content_id, content_type)` triple.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    pub viewer_id: Option<String>,
    pub content_id: String,
    pub content_type: ContentType,
    pub title: String,
    pub created_at: u64,
}

/// Per-viewer set of favorited content items.
///
/// Persistence follows the overlay store: every mutation writes the full ledger back to the
/// local store, and a failed write keeps the in-memory ledger authoritative for the session.
#[derive(Debug)]
pub struct FavoritesLedger<S> {
    store: S,
    entries: Vec<FavoriteEntry>,
}

impl<S> FavoritesLedger<S>
where
    S: LocalStore,
{
    /// Load the ledger from the local store. An absent key is an empty ledger, a corrupt blob is
    /// ignored with a warning.
    pub fn load(store: S) -> Self {
        let entries = read_entries(&store, keys::FAVORITES);
        Self { store, entries }
    }

    /// Toggle a favorite and return the new state, `true` when the item is now favorited.
    ///
    /// An involution: toggling twice with identical arguments restores the original state.
    pub fn toggle(
        &mut self,
        viewer_id: Option<&str>,
        content_id: &str,
        content_type: ContentType,
        title: &str,
    ) -> Result<bool, StorageError> {
        let position = self
            .entries
            .iter()
            .position(|entry| entry_matches(entry, viewer_id, content_id, content_type));

        let favorited = match position {
            Some(position) => {
                self.entries.remove(position);
                false
            }
            None => {
                self.entries.push(FavoriteEntry {
                    viewer_id: viewer_id.map(str::to_string),
                    content_id: content_id.to_string(),
                    content_type,
                    title: title.to_string(),
                    created_at: unix_millis(),
                });
                true
            }
        };

        self.persist()?;
        Ok(favorited)
    }

    /// Pure membership check.
    pub fn is_favorited(
        &self,
        viewer_id: Option<&str>,
        content_id: &str,
        content_type: ContentType,
    ) -> bool {
        self.entries
            .iter()
            .any(|entry| entry_matches(entry, viewer_id, content_id, content_type))
    }

    /// All entries of one viewer, in creation order.
    pub fn entries_for(&self, viewer_id: Option<&str>) -> Vec<&FavoriteEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.viewer_id.as_deref() == viewer_id)
            .collect()
    }

    /// Adopt favorites recorded before the given viewer signed in.
    ///
    /// Two sources are drained: entries under the legacy (pre-scoping) key and entries recorded
    /// anonymously in this ledger. Both become entries scoped to `viewer_id`; collisions with
    /// already-scoped entries are skipped. Afterwards the legacy key is removed, which makes the
    /// adoption a no-op when run again.
    ///
    /// Returns the number of adopted entries.
    pub fn adopt_legacy(&mut self, viewer_id: &str) -> Result<usize, StorageError> {
        let had_legacy = self.store.get(keys::LEGACY_FAVORITES)?.is_some();
        let legacy = if had_legacy {
            read_entries(&self.store, keys::LEGACY_FAVORITES)
        } else {
            Vec::new()
        };

        let anonymous: Vec<FavoriteEntry> = self
            .entries
            .iter()
            .filter(|entry| entry.viewer_id.is_none())
            .cloned()
            .collect();
        self.entries.retain(|entry| entry.viewer_id.is_some());

        let mut adopted = 0;
        for mut entry in legacy.into_iter().chain(anonymous.iter().cloned()) {
            if self.is_favorited(Some(viewer_id), &entry.content_id, entry.content_type) {
                continue;
            }

            entry.viewer_id = Some(viewer_id.to_string());
            self.entries.push(entry);
            adopted += 1;
        }

        if adopted > 0 || !anonymous.is_empty() || had_legacy {
            self.persist()?;
            self.store.remove(keys::LEGACY_FAVORITES)?;
        }

        Ok(adopted)
    }

    /// Remove all entries of one viewer and persist the shrunk ledger.
    pub fn purge(&mut self, viewer_id: Option<&str>) -> Result<(), StorageError> {
        self.entries
            .retain(|entry| entry.viewer_id.as_deref() != viewer_id);
        self.persist()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) -> Result<(), StorageError> {
        let blob = serde_json::to_string(&self.entries)?;
        let result = self.store.set(keys::FAVORITES, &blob);

        if let Err(err) = &result {
            // In-memory state stays authoritative for the session.
            warn!(%err, "failed to persist favorites ledger");
        }

        result
    }
}

fn entry_matches(
    entry: &FavoriteEntry,
    viewer_id: Option<&str>,
    content_id: &str,
    content_type: ContentType,
) -> bool {
    entry.viewer_id.as_deref() == viewer_id
        && entry.content_id == content_id
        && entry.content_type == content_type
}

fn read_entries<S>(store: &S, key: &str) -> Vec<FavoriteEntry>
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
            Ok(entries) => entries,
            Err(err) => {
                warn!(key, %err, "ignoring corrupt favorites blob");
                Vec::new()
            }
        },
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use atelier_core::content::ContentType;

    use crate::favorites::{FavoriteEntry, FavoritesLedger};
    use crate::keys;
    use crate::memory::MemoryStore;
    use crate::traits::LocalStore;

    #[test]
    fn toggle_is_an_involution() {
        let mut ledger = FavoritesLedger::load(MemoryStore::new());

        // Favorite, then un-favorite the same gradient.
        assert!(ledger
            .toggle(Some("user-1"), "g7", ContentType::Gradient, "Dusk")
            .unwrap());
        assert!(ledger.is_favorited(Some("user-1"), "g7", ContentType::Gradient));

        assert!(!ledger
            .toggle(Some("user-1"), "g7", ContentType::Gradient, "Dusk")
            .unwrap());
        assert!(!ledger.is_favorited(Some("user-1"), "g7", ContentType::Gradient));
        assert!(ledger.entries_for(Some("user-1")).is_empty());
    }

    #[test]
    fn entries_are_scoped_per_viewer_and_type() {
        let mut ledger = FavoritesLedger::load(MemoryStore::new());

        ledger
            .toggle(Some("user-1"), "g7", ContentType::Gradient, "Dusk")
            .unwrap();
        ledger
            .toggle(None, "g7", ContentType::Gradient, "Dusk")
            .unwrap();

        // Same content id under a different type is a distinct entry.
        ledger
            .toggle(Some("user-1"), "g7", ContentType::Project, "Dusk")
            .unwrap();

        assert_eq!(ledger.entries_for(Some("user-1")).len(), 2);
        assert_eq!(ledger.entries_for(None).len(), 1);
    }

    #[test]
    fn legacy_and_anonymous_favorites_are_adopted_once() {
        let store = MemoryStore::new();

        let legacy = vec![FavoriteEntry {
            viewer_id: None,
            content_id: "g1".to_string(),
            content_type: ContentType::Gradient,
            title: "Dawn".to_string(),
            created_at: 1,
        }];
        store
            .set(
                keys::LEGACY_FAVORITES,
                &serde_json::to_string(&legacy).unwrap(),
            )
            .unwrap();

        let mut ledger = FavoritesLedger::load(store.clone());
        ledger
            .toggle(None, "g2", ContentType::Gradient, "Dusk")
            .unwrap();

        // 1. First login adopts both the legacy entry and the anonymous one.
        assert_eq!(ledger.adopt_legacy("user-1").unwrap(), 2);
        assert!(ledger.is_favorited(Some("user-1"), "g1", ContentType::Gradient));
        assert!(ledger.is_favorited(Some("user-1"), "g2", ContentType::Gradient));
        assert!(ledger.entries_for(None).is_empty());
        assert!(store.get(keys::LEGACY_FAVORITES).unwrap().is_none());

        // 2. Running the adoption again is a no-op.
        assert_eq!(ledger.adopt_legacy("user-1").unwrap(), 0);
        assert_eq!(ledger.entries_for(Some("user-1")).len(), 2);
    }

    #[test]
    fn adoption_skips_collisions_with_scoped_entries() {
        let mut ledger = FavoritesLedger::load(MemoryStore::new());

        ledger
            .toggle(Some("user-1"), "g1", ContentType::Gradient, "Dawn")
            .unwrap();
        ledger
            .toggle(None, "g1", ContentType::Gradient, "Dawn")
            .unwrap();

        assert_eq!(ledger.adopt_legacy("user-1").unwrap(), 0);
        assert_eq!(ledger.entries_for(Some("user-1")).len(), 1);
    }

    #[test]
    fn ledger_survives_a_reload() {
        let store = MemoryStore::new();

        let mut ledger = FavoritesLedger::load(store.clone());
        ledger
            .toggle(Some("user-1"), "g7", ContentType::Gradient, "Dusk")
            .unwrap();

        let reloaded = FavoritesLedger::load(store);
        assert!(reloaded.is_favorited(Some("user-1"), "g7", ContentType::Gradient));
    }

    #[test]
    fn purge_removes_one_viewer_only() {
        let mut ledger = FavoritesLedger::load(MemoryStore::new());

        ledger
            .toggle(Some("user-1"), "g7", ContentType::Gradient, "Dusk")
            .unwrap();
        ledger
            .toggle(Some("user-2"), "g7", ContentType::Gradient, "Dusk")
            .unwrap();

        ledger.purge(Some("user-1")).unwrap();

        assert!(!ledger.is_favorited(Some("user-1"), "g7", ContentType::Gradient));
        assert!(ledger.is_favorited(Some("user-2"), "g7", ContentType::Gradient));
    }
}
