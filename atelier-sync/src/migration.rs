// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::Display;

use atelier_core::content::ContentType;
use atelier_core::identity::User;
use atelier_store::favorites::FavoritesLedger;
use atelier_store::overlay::OverlayStore;
use atelier_store::traits::LocalStore;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::traits::{AuthSession, RemoteStore};

/// The local collections drained by a migration, in migration order.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Gradients,
    Favorites,
    Projects,
    BlogPosts,
}

impl Collection {
    /// Migration order. Fixed so error attribution stays stable across runs.
    pub const ALL: [Collection; 4] = [
        Collection::Gradients,
        Collection::Favorites,
        Collection::Projects,
        Collection::BlogPosts,
    ];

    /// The content type backing this collection. `None` for favorites, which hold entries of any
    /// content type.
    pub fn content_type(&self) -> Option<ContentType> {
        match self {
            Collection::Gradients => Some(ContentType::Gradient),
            Collection::Favorites => None,
            Collection::Projects => Some(ContentType::Project),
            Collection::BlogPosts => Some(ContentType::BlogPost),
        }
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Collection::Gradients => "gradients",
            Collection::Favorites => "favorites",
            Collection::Projects => "projects",
            Collection::BlogPosts => "blog posts",
        };

        write!(f, "{s}")
    }
}

/// Lifecycle of one migration run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationState {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    CompletedWithErrors,
}

/// When to skip a migration because remote data already exists.
///
/// The historical behavior is `SkipIfAnyRemoteData`: one unrelated remote record anywhere strands
/// all newer local edits. That stays the default, but integrators who consider it a data-loss
/// hazard can narrow the check to the collection being migrated, or disable it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PreconditionPolicy {
    #[default]
    SkipIfAnyRemoteData,
    SkipIfCollectionHasRemoteData,
    AlwaysMigrate,
}

/// Why a migration run transferred nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No local overlay or favorites data exists.
    NoLocalData,

    /// The viewer already has remote data and the policy forbids migrating over it.
    RemoteDataExists,

    /// The remote store could not be probed; nothing was migrated to avoid overwriting state
    /// that may exist.
    RemoteUnavailable,
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SkipReason::NoLocalData => "no local data",
            SkipReason::RemoteDataExists => "remote data already exists",
            SkipReason::RemoteUnavailable => "remote store unavailable",
        };

        write!(f, "{s}")
    }
}

/// A failure scoped to one collection. Sibling collections are unaffected by it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CollectionError {
    pub collection: Collection,
    pub message: String,
}

impl Display for CollectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.collection, self.message)
    }
}

/// Items transferred per collection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MigratedCounts {
    pub gradients: usize,
    pub favorites: usize,
    pub projects: usize,
    pub blog_posts: usize,
}

impl MigratedCounts {
    pub fn total(&self) -> usize {
        self.gradients + self.favorites + self.projects + self.blog_posts
    }

    fn record(&mut self, collection: Collection, count: usize) {
        match collection {
            Collection::Gradients => self.gradients = count,
            Collection::Favorites => self.favorites = count,
            Collection::Projects => self.projects = count,
            Collection::BlogPosts => self.blog_posts = count,
        }
    }

    fn get(&self, collection: Collection) -> usize {
        match collection {
            Collection::Gradients => self.gradients,
            Collection::Favorites => self.favorites,
            Collection::Projects => self.projects,
            Collection::BlogPosts => self.blog_posts,
        }
    }
}

/// Result of one migration run, the basis for the single user-facing notification.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MigrationReport {
    pub migrated: MigratedCounts,
    pub errors: Vec<CollectionError>,
    pub skipped: Option<SkipReason>,
    pub skipped_collections: Vec<Collection>,
}

impl MigrationReport {
    /// The run finished without a single collection error.
    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }

    /// One-line summary with counts per collection and accumulated error messages.
    pub fn summary(&self) -> String {
        if let Some(reason) = &self.skipped {
            return format!("migration skipped: {reason}");
        }

        let counts: Vec<String> = Collection::ALL
            .iter()
            .filter(|collection| self.migrated.get(**collection) > 0)
            .map(|collection| format!("{} {}", self.migrated.get(*collection), collection))
            .collect();
        let counts = if counts.is_empty() {
            "nothing to transfer".to_string()
        } else {
            counts.join(", ")
        };

        if self.errors.is_empty() {
            format!("migration finished: {counts}")
        } else {
            let failures: Vec<String> = self.errors.iter().map(CollectionError::to_string).collect();
            format!(
                "migration finished with errors: {} ({counts})",
                failures.join("; ")
            )
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MigrationError {
    /// A migration value runs at most once. Re-invocation happens only via a future login event
    /// constructing a fresh one.
    #[error("migration already ran (state {0:?})")]
    AlreadyRan(MigrationState),
}

/// One-shot migration of local overlay and favorites data into the remote store.
///
/// Collections are migrated sequentially in [`Collection::ALL`] order; each collection fails in
/// isolation and is purged from local storage as soon as it transferred cleanly. Failed
/// collections keep their local data so a later login can retry them.
#[derive(Debug, Default)]
pub struct Migration {
    state: MigrationState,
    policy: PreconditionPolicy,
}

impl Migration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: PreconditionPolicy) -> Self {
        Self {
            state: MigrationState::NotStarted,
            policy,
        }
    }

    pub fn state(&self) -> MigrationState {
        self.state
    }

    /// Run the migration for an authenticated user.
    pub async fn run<S, R>(
        &mut self,
        user: &User,
        overlay: &mut OverlayStore<S>,
        favorites: &mut FavoritesLedger<S>,
        remote: &R,
    ) -> Result<MigrationReport, MigrationError>
    where
        S: LocalStore,
        R: RemoteStore,
    {
        if self.state != MigrationState::NotStarted {
            return Err(MigrationError::AlreadyRan(self.state));
        }
        self.state = MigrationState::InProgress;

        let mut report = MigrationReport::default();

        if overlay.is_empty() && favorites.is_empty() {
            report.skipped = Some(SkipReason::NoLocalData);
            self.state = MigrationState::Completed;
            return Ok(report);
        }

        if self.policy == PreconditionPolicy::SkipIfAnyRemoteData {
            match has_any_remote_data(user, remote).await {
                Ok(true) => {
                    report.skipped = Some(SkipReason::RemoteDataExists);
                    self.state = MigrationState::Completed;
                    debug!(user_id = %user.id, "skipping migration, remote data exists");
                    return Ok(report);
                }
                Ok(false) => {}
                Err(error) => {
                    warn!(user_id = %user.id, %error, "remote precondition probe failed");
                    report.skipped = Some(SkipReason::RemoteUnavailable);
                    report.errors.push(error);
                    self.state = MigrationState::CompletedWithErrors;
                    return Ok(report);
                }
            }
        }

        for collection in Collection::ALL {
            if self.policy == PreconditionPolicy::SkipIfCollectionHasRemoteData {
                match has_remote_data(user, remote, collection).await {
                    Ok(true) => {
                        report.skipped_collections.push(collection);
                        debug!(user_id = %user.id, %collection, "remote data exists, skipping");
                        continue;
                    }
                    Ok(false) => {}
                    Err(error) => {
                        report.errors.push(error);
                        continue;
                    }
                }
            }

            let migrated = match collection {
                Collection::Favorites => migrate_favorites(user, favorites, remote).await,
                Collection::Gradients | Collection::Projects | Collection::BlogPosts => {
                    migrate_content(user, overlay, remote, collection).await
                }
            };

            match migrated {
                Ok(count) => {
                    report.migrated.record(collection, count);
                    debug!(user_id = %user.id, %collection, count, "collection migrated");

                    // Purge the collection's local data right away; failed siblings keep theirs.
                    let purged = match collection.content_type() {
                        Some(content_type) => overlay.purge(content_type),
                        None => favorites.purge(Some(user.id.as_str())),
                    };
                    if let Err(err) = purged {
                        warn!(user_id = %user.id, %collection, %err, "failed to purge local data");
                        report.errors.push(CollectionError {
                            collection,
                            message: format!("failed to purge local data: {err}"),
                        });
                    }
                }
                Err(error) => {
                    warn!(user_id = %user.id, %error, "collection migration failed");
                    report.errors.push(error);
                }
            }
        }

        self.state = if report.success() {
            MigrationState::Completed
        } else {
            MigrationState::CompletedWithErrors
        };

        Ok(report)
    }
}

/// Evaluate the login trigger: adopt pre-login favorites, then migrate local data for the
/// authenticated user. Returns `None` when nobody is logged in.
pub async fn migrate_on_login<A, S, R>(
    session: &A,
    overlay: &mut OverlayStore<S>,
    favorites: &mut FavoritesLedger<S>,
    remote: &R,
    policy: PreconditionPolicy,
) -> Result<Option<MigrationReport>, MigrationError>
where
    A: AuthSession,
    S: LocalStore,
    R: RemoteStore,
{
    let Some(user) = session.current_user() else {
        return Ok(None);
    };

    // Scope pre-login favorites to this viewer before draining the ledger. A storage failure
    // here leaves the legacy entries in place for the next login, migration still proceeds.
    if let Err(err) = favorites.adopt_legacy(&user.id) {
        warn!(user_id = %user.id, %err, "failed to adopt pre-login favorites");
    }

    let mut migration = Migration::with_policy(policy);
    let report = migration.run(&user, overlay, favorites, remote).await?;
    Ok(Some(report))
}

async fn migrate_content<S, R>(
    user: &User,
    overlay: &OverlayStore<S>,
    remote: &R,
    collection: Collection,
) -> Result<usize, CollectionError>
where
    S: LocalStore,
    R: RemoteStore,
{
    let Some(content_type) = collection.content_type() else {
        return Ok(0);
    };

    let mut count = 0;
    for item in overlay.local_items(content_type) {
        remote
            .upsert_content(&user.id, &item)
            .await
            .map_err(|err| CollectionError {
                collection,
                message: err.to_string(),
            })?;
        count += 1;
    }

    Ok(count)
}

async fn migrate_favorites<S, R>(
    user: &User,
    favorites: &FavoritesLedger<S>,
    remote: &R,
) -> Result<usize, CollectionError>
where
    S: LocalStore,
    R: RemoteStore,
{
    let mut count = 0;
    for entry in favorites.entries_for(Some(user.id.as_str())) {
        remote
            .upsert_favorite(&user.id, entry)
            .await
            .map_err(|err| CollectionError {
                collection: Collection::Favorites,
                message: err.to_string(),
            })?;
        count += 1;
    }

    Ok(count)
}

async fn has_remote_data<R>(
    user: &User,
    remote: &R,
    collection: Collection,
) -> Result<bool, CollectionError>
where
    R: RemoteStore,
{
    let result = match collection.content_type() {
        Some(content_type) => remote.has_content(&user.id, content_type).await,
        None => remote.has_favorites(&user.id).await,
    };

    result.map_err(|err| CollectionError {
        collection,
        message: format!("failed to probe remote store: {err}"),
    })
}

async fn has_any_remote_data<R>(user: &User, remote: &R) -> Result<bool, CollectionError>
where
    R: RemoteStore,
{
    for collection in Collection::ALL {
        if has_remote_data(user, remote, collection).await? {
            return Ok(true);
        }
    }

    Ok(false)
}
