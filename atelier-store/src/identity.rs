// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence of the local pseudo-identity and the cached user profile.
//!
//! When a real user is present alongside a persisted local identity, the local identity must be
//! cleared, never merged; [`atelier_core::identity::Viewer::resolve`] reports that case and the
//! host acts on it with [`clear_local_identity`].

use atelier_core::identity::{LocalIdentity, User};
use tracing::warn;

use crate::keys;
use crate::traits::{LocalStore, StorageError};

/// Read the persisted local pseudo-identity, if any. A corrupt blob is ignored with a warning.
pub fn load_local_identity<S>(store: &S) -> Option<LocalIdentity>
where
    S: LocalStore,
{
    read_blob(store, keys::LOCAL_IDENTITY)
}

pub fn save_local_identity<S>(store: &S, identity: &LocalIdentity) -> Result<(), StorageError>
where
    S: LocalStore,
{
    let blob = serde_json::to_string(identity)?;
    store.set(keys::LOCAL_IDENTITY, &blob)
}

pub fn clear_local_identity<S>(store: &S) -> Result<(), StorageError>
where
    S: LocalStore,
{
    store.remove(keys::LOCAL_IDENTITY)
}

/// Read the cached profile of the signed-in user, if any.
pub fn load_profile<S>(store: &S) -> Option<User>
where
    S: LocalStore,
{
    read_blob(store, keys::PROFILE)
}

pub fn save_profile<S>(store: &S, user: &User) -> Result<(), StorageError>
where
    S: LocalStore,
{
    let blob = serde_json::to_string(user)?;
    store.set(keys::PROFILE, &blob)
}

pub fn clear_profile<S>(store: &S) -> Result<(), StorageError>
where
    S: LocalStore,
{
    store.remove(keys::PROFILE)
}

fn read_blob<S, T>(store: &S, key: &str) -> Option<T>
where
    S: LocalStore,
    T: serde::de::DeserializeOwned,
{
    let blob = match store.get(key) {
        Ok(blob) => blob?,
        Err(err) => {
            warn!(key, %err, "failed to read local store");
            return None;
        }
    };

    match serde_json::from_str(&blob) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(key, %err, "ignoring corrupt identity blob");
            None
        }
    }
}
