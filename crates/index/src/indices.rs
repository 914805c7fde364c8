//! Registry of open indexes keyed by repository id

use crate::artifact_index::ArtifactIndex;
use crate::listener::{IndexListener, IndexListenerRegistry};
use crate::{RepositoryIndex, SearchIndex};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use depot_core::{ArtifactInfo, Config, Error, RepositoryInfo, Result};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// The set of open [`ArtifactIndex`]es, keyed by repository id
///
/// All indexes opened through one `Indices` share a single
/// [`IndexListenerRegistry`], so a subscriber hears about any of them
/// breaking.
pub struct Indices {
    indexes: DashMap<String, Arc<ArtifactIndex>>,
    listeners: Arc<IndexListenerRegistry>,
    max_search_results: usize,
}

impl Indices {
    pub fn new() -> Self {
        Self {
            indexes: DashMap::new(),
            listeners: Arc::new(IndexListenerRegistry::new()),
            max_search_results: Config::default().max_search_results,
        }
    }

    /// Opens one index per configured repository
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let mut indices = Self::new();
        indices.max_search_results = config.max_search_results;
        for repo in &config.repositories {
            let info = RepositoryInfo::new(&repo.id, &repo.id, &repo.path_or_url, repo.kind);
            indices.open(info)?;
        }
        Ok(indices)
    }

    /// Subscribes a listener to broken-index notifications from any index
    pub fn subscribe(&self, listener: Arc<dyn IndexListener>) {
        self.listeners.subscribe(listener);
    }

    pub fn listeners(&self) -> Arc<IndexListenerRegistry> {
        Arc::clone(&self.listeners)
    }

    /// Opens an index for `repository`; repository ids must be unique
    pub fn open(&self, repository: RepositoryInfo) -> Result<Arc<ArtifactIndex>> {
        match self.indexes.entry(repository.id.clone()) {
            Entry::Occupied(_) => Err(Error::index(format!(
                "Repository '{}' is already indexed",
                repository.id
            ))),
            Entry::Vacant(slot) => {
                let index = Arc::new(ArtifactIndex::open(
                    repository,
                    Arc::clone(&self.listeners),
                ));
                slot.insert(Arc::clone(&index));
                Ok(index)
            }
        }
    }

    pub fn get(&self, repository_id: &str) -> Option<Arc<ArtifactIndex>> {
        self.indexes
            .get(repository_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Searches every open index and merges the matches
    ///
    /// The configured `max_search_results` caps the merged set. Indexes
    /// that were closed through their own handle are skipped rather than
    /// failing the whole search.
    pub fn search(&self, pattern: &str) -> HashSet<ArtifactInfo> {
        self.search_limited(pattern, self.max_search_results)
    }

    /// Like [`Indices::search`] with an explicit result cap
    pub fn search_limited(&self, pattern: &str, max_result: usize) -> HashSet<ArtifactInfo> {
        let mut matches = HashSet::new();
        for entry in self.indexes.iter() {
            if matches.len() >= max_result {
                break;
            }
            let remaining = max_result - matches.len();
            match entry.value().search(pattern, remaining) {
                Ok(found) => matches.extend(found),
                Err(e) => {
                    debug!("Skipping index '{}': {e}", entry.key());
                }
            }
        }
        matches
    }

    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    /// Closes every index and forgets it
    pub fn close_all(&self, release_index_context: bool) {
        info!("Closing {} indexes", self.indexes.len());
        for entry in self.indexes.iter() {
            entry.value().close(release_index_context);
        }
        self.indexes.clear();
    }
}

impl Default for Indices {
    fn default() -> Self {
        Self::new()
    }
}
