#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! Repository index contracts and the in-memory artifact index
//!
//! The two traits in this crate describe what any open repository index
//! must provide: [`RepositoryIndex`] covers identity and lifecycle,
//! [`SearchIndex`] adds update bookkeeping and bounded coordinate search.
//! [`ArtifactIndex`] is the concrete implementation backed by a plain
//! artifact set, and [`Indices`] manages the set of open indexes.
//!
//! A failing index reports, it does not throw: update failures are
//! surfaced through [`SearchIndex::failure_message`] and broadcast to
//! [`IndexListener`] subscribers. The only hard search error is querying
//! an index after it was closed.

mod artifact_index;
mod indices;
mod listener;

pub use artifact_index::ArtifactIndex;
pub use indices::Indices;
pub use listener::{IndexListener, IndexListenerRegistry};

use depot_core::{ArtifactInfo, RepositoryInfo, RepositoryKind, Result};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::SystemTime;

/// Contract shared by every open repository index
pub trait RepositoryIndex: Send + Sync {
    fn kind(&self) -> RepositoryKind;

    fn repository(&self) -> RepositoryInfo;

    /// Closes the index; safe to call more than once
    ///
    /// When `release_index_context` is true the artifact store is dropped
    /// immediately; otherwise it is kept in memory until the index itself
    /// is dropped. Either way, later searches fail with
    /// [`depot_core::Error::IndexClosed`] rather than serving stale results.
    fn close(&self, release_index_context: bool);
}

/// A repository index that can answer bounded coordinate searches
pub trait SearchIndex: RepositoryIndex {
    fn repository_id(&self) -> String;

    /// Root directory of a local repository, `None` for remote ones
    fn repository_file(&self) -> Option<PathBuf>;

    /// Repository URL, `None` for local repositories
    fn repository_url(&self) -> Option<String>;

    fn repository_path_or_url(&self) -> String;

    /// Time of the most recent successful update, `None` before the first
    fn update_timestamp(&self) -> Option<SystemTime>;

    /// `None` exactly when the most recent update succeeded
    fn failure_message(&self) -> Option<String>;

    /// Returns at most `max_result` artifacts matching `pattern`
    ///
    /// Ordering is unspecified. An empty pattern matches nothing.
    fn search(&self, pattern: &str, max_result: usize) -> Result<HashSet<ArtifactInfo>>;
}
