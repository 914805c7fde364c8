//! In-memory artifact index populated from a local repository layout

use crate::listener::IndexListenerRegistry;
use crate::{RepositoryIndex, SearchIndex};
use depot_core::{ArtifactInfo, Error, RepositoryInfo, RepositoryKind, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::SystemTime;
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Debug, Default)]
struct IndexState {
    artifacts: HashSet<ArtifactInfo>,
    update_timestamp: Option<SystemTime>,
    failure_message: Option<String>,
    closed: bool,
}

/// A [`SearchIndex`] over a plain set of artifact coordinates
///
/// Matching is case-insensitive substring matching against the
/// `group:artifact:version` form; there is no inverted index and no
/// result ranking.
pub struct ArtifactIndex {
    repository: RepositoryInfo,
    state: RwLock<IndexState>,
    listeners: Arc<IndexListenerRegistry>,
}

impl ArtifactIndex {
    /// Opens an empty index for `repository`
    pub fn open(repository: RepositoryInfo, listeners: Arc<IndexListenerRegistry>) -> Self {
        debug!("Opening index for repository '{}'", repository.id);
        Self {
            repository,
            state: RwLock::new(IndexState::default()),
            listeners,
        }
    }

    /// Rebuilds the artifact set by scanning a Maven-layout directory tree
    ///
    /// Coordinates are derived from each `.pom` path:
    /// `com/example/lib/1.2.0/lib-1.2.0.pom` becomes `com.example:lib:1.2.0`.
    /// On failure the previous artifact set is kept and the failure is
    /// reported through [`SearchIndex::failure_message`] and the listener
    /// registry, in addition to the returned error.
    pub fn update_from_local_layout(&self, root: &Path) -> Result<()> {
        if self.is_closed() {
            return Err(Error::index_closed(self.repository.id.as_str()));
        }

        match scan_local_layout(root) {
            Ok(artifacts) => {
                info!(
                    "Indexed {} artifacts from {}",
                    artifacts.len(),
                    root.display()
                );
                let mut state = self.write_state();
                // The scan ran without the lock held; a close may have
                // landed since and must not see its store repopulated
                if state.closed {
                    return Err(Error::index_closed(self.repository.id.as_str()));
                }
                state.artifacts = artifacts;
                state.update_timestamp = Some(SystemTime::now());
                state.failure_message = None;
                Ok(())
            }
            Err(e) => {
                self.record_failure(e.to_string());
                Err(e)
            }
        }
    }

    /// Replaces the artifact set directly, e.g. from a remote catalog
    pub fn replace_artifacts<I>(&self, artifacts: I) -> Result<()>
    where
        I: IntoIterator<Item = ArtifactInfo>,
    {
        let mut state = self.write_state();
        if state.closed {
            return Err(Error::index_closed(self.repository.id.as_str()));
        }
        state.artifacts = artifacts.into_iter().collect();
        state.update_timestamp = Some(SystemTime::now());
        state.failure_message = None;
        Ok(())
    }

    /// Marks the index broken without touching its contents
    pub fn mark_broken(&self, message: impl Into<String>) {
        self.record_failure(message.into());
    }

    pub fn is_closed(&self) -> bool {
        self.read_state().closed
    }

    pub fn artifact_count(&self) -> usize {
        self.read_state().artifacts.len()
    }

    /// Records a failure and broadcasts the broken transition once
    fn record_failure(&self, message: String) {
        let newly_broken = {
            let mut state = self.write_state();
            let newly_broken = state.failure_message.is_none();
            state.failure_message = Some(message);
            newly_broken
        };
        if newly_broken {
            self.listeners.notify_broken(self);
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, IndexState> {
        match self.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, IndexState> {
        match self.state.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl RepositoryIndex for ArtifactIndex {
    fn kind(&self) -> RepositoryKind {
        self.repository.kind
    }

    fn repository(&self) -> RepositoryInfo {
        self.repository.clone()
    }

    fn close(&self, release_index_context: bool) {
        let mut state = self.write_state();
        if !state.closed {
            debug!("Closing index for repository '{}'", self.repository.id);
            state.closed = true;
        }
        if release_index_context {
            // Drop the backing storage now instead of at index drop time
            state.artifacts = HashSet::new();
        }
    }
}

impl SearchIndex for ArtifactIndex {
    fn repository_id(&self) -> String {
        self.repository.id.clone()
    }

    fn repository_file(&self) -> Option<PathBuf> {
        self.repository.path()
    }

    fn repository_url(&self) -> Option<String> {
        self.repository.url().map(str::to_owned)
    }

    fn repository_path_or_url(&self) -> String {
        self.repository.path_or_url.clone()
    }

    fn update_timestamp(&self) -> Option<SystemTime> {
        self.read_state().update_timestamp
    }

    fn failure_message(&self) -> Option<String> {
        self.read_state().failure_message.clone()
    }

    fn search(&self, pattern: &str, max_result: usize) -> Result<HashSet<ArtifactInfo>> {
        let state = self.read_state();
        if state.closed {
            return Err(Error::index_closed(self.repository.id.as_str()));
        }
        if pattern.is_empty() || max_result == 0 {
            return Ok(HashSet::new());
        }

        let needle = pattern.to_lowercase();
        let mut matches = HashSet::new();
        for artifact in &state.artifacts {
            if artifact.coordinate().to_lowercase().contains(&needle) {
                matches.insert(artifact.clone());
                if matches.len() == max_result {
                    break;
                }
            }
        }
        Ok(matches)
    }
}

fn scan_local_layout(root: &Path) -> Result<HashSet<ArtifactInfo>> {
    if !root.is_dir() {
        return Err(Error::index(format!(
            "Repository path {} is not a directory",
            root.display()
        )));
    }

    let mut artifacts = HashSet::new();
    for entry in WalkDir::new(root) {
        let entry = entry
            .map_err(|e| Error::index(format!("Failed to walk {}: {e}", root.display())))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|e| e.to_str()) != Some("pom") {
            continue;
        }
        if let Some(artifact) = coordinates_from_pom_path(root, entry.path()) {
            artifacts.insert(artifact);
        }
    }
    Ok(artifacts)
}

/// Derives coordinates from a Maven-layout pom path
///
/// Expects `<group dirs>/<artifact>/<version>/<artifact>-<version>.pom`
/// relative to the repository root; anything else is skipped.
fn coordinates_from_pom_path(root: &Path, pom: &Path) -> Option<ArtifactInfo> {
    let relative = pom.strip_prefix(root).ok()?;
    let mut components: Vec<&str> = relative.iter().filter_map(|c| c.to_str()).collect();

    let file_name = components.pop()?;
    let version = components.pop()?;
    let artifact_id = components.pop()?;
    if components.is_empty() {
        return None;
    }
    if file_name != format!("{artifact_id}-{version}.pom") {
        return None;
    }

    let mut artifact = ArtifactInfo::new(components.join("."), artifact_id, version);
    artifact.packaging = Some("pom".to_string());
    Some(artifact)
}
