// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot transfer of locally-held content and favorites into the remote store.
//!
//! The migration runs when a viewer logs in for the first time while local data exists. Remote
//! upserts are keyed by stable content ids, so an abandoned or repeated run converges instead of
//! duplicating records. Collections are migrated one after another and fail in isolation: an
//! error in one collection never aborts the others.

pub mod migration;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
pub mod traits;


pub use migration::{
    Collection, CollectionError, MigratedCounts, Migration, MigrationError, MigrationReport,
    MigrationState, PreconditionPolicy, SkipReason, migrate_on_login,
};
pub use traits::{AuthSession, RemoteStore};
