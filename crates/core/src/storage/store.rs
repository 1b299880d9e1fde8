use parking_lot::RwLock;
use std::sync::Arc;

use crate::models::snapshot::RawSnapshot;

use super::source::{LoadOutcome, SnapshotSource};

/// Cache state guarded by the store's lock.
#[derive(Default)]
struct CacheState {
    snapshot: Option<Arc<RawSnapshot>>,
    /// Completed source reads so far
    generation: u64,
}

/// Lazily loaded, explicitly invalidated cache of the current snapshot.
///
/// Readers share one `Arc<RawSnapshot>`; a reload swaps in a new one and
/// leaves snapshots already handed out untouched. Loading and invalidation
/// take the write lock, so concurrent first loads read the source once.
pub struct SnapshotStore {
    source: Box<dyn SnapshotSource>,
    state: RwLock<CacheState>,
}

impl SnapshotStore {
    pub fn new(source: Box<dyn SnapshotSource>) -> Self {
        Self {
            source,
            state: RwLock::new(CacheState::default()),
        }
    }

    /// The cached snapshot, reading the source first if nothing is cached.
    ///
    /// Never fails: an unreadable source yields [`RawSnapshot::fallback`],
    /// which is then cached like any other snapshot until the next invalidation.
    pub fn load(&self) -> Arc<RawSnapshot> {
        if let Some(snapshot) = self.state.read().snapshot.as_ref() {
            return Arc::clone(snapshot);
        }

        let mut state = self.state.write();
        // Another reader may have loaded while we waited for the write lock.
        if let Some(snapshot) = state.snapshot.as_ref() {
            return Arc::clone(snapshot);
        }

        let snapshot = Arc::new(self.read_source());
        state.snapshot = Some(Arc::clone(&snapshot));
        state.generation += 1;
        snapshot
    }

    /// Drop the cached snapshot so the next [`load`](Self::load) re-reads the source.
    /// Idempotent; fine to call before anything was loaded.
    pub fn invalidate(&self) {
        let mut state = self.state.write();
        state.snapshot = None;
        log::info!("Portfolio data cache cleared, will reload on next request");
    }

    /// Number of times the source has been read.
    pub fn generation(&self) -> u64 {
        self.state.read().generation
    }

    pub fn is_loaded(&self) -> bool {
        self.state.read().snapshot.is_some()
    }

    /// Location of the backing source, for logs and diagnostics.
    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    fn read_source(&self) -> RawSnapshot {
        match LoadOutcome::from_source(self.source.as_ref()) {
            LoadOutcome::Loaded(snapshot) => {
                let imported_at = snapshot
                    .metadata
                    .imported_at
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                log::info!(
                    "Loaded portfolio data from {} (imported: {imported_at}, {} holdings)",
                    self.source.describe(),
                    snapshot.holdings.len()
                );
                snapshot
            }
            LoadOutcome::LoadFailed(cause) => {
                log::warn!("Error loading portfolio data, using fallback: {cause}");
                RawSnapshot::fallback()
            }
        }
    }
}

impl std::fmt::Debug for SnapshotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("SnapshotStore")
            .field("source", &self.source.describe())
            .field("loaded", &state.snapshot.is_some())
            .field("generation", &state.generation)
            .finish()
    }
}
