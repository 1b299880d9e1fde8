pub mod errors;
pub mod models;
pub mod rounding;
pub mod services;
pub mod storage;

use std::sync::Arc;

use errors::{CoreError, View, ViewError};
use models::{
    allocation::Allocation,
    holding::Holding,
    performance::Performance,
    settings::Settings,
    snapshot::{RawSnapshot, SnapshotMetadata},
    summary::Summary,
};
use services::{
    allocation_service::AllocationService, holding_service::HoldingService,
    performance_service::PerformanceService, summary_service::SummaryService,
};
use storage::{
    source::{InMemorySource, JsonFileSource, SnapshotSource},
    store::SnapshotStore,
};

/// Main entry point for the Portfolio Analytics core library.
///
/// Holds the snapshot store and the services that derive the four reporting
/// views from it. Every view is computed fresh from the cached snapshot and
/// fails independently of the others. Safe to share across threads.
#[must_use]
pub struct PortfolioAnalytics {
    store: SnapshotStore,
    holding_service: HoldingService,
    allocation_service: AllocationService,
    performance_service: PerformanceService,
    summary_service: SummaryService,
}

impl std::fmt::Debug for PortfolioAnalytics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioAnalytics")
            .field("source", &self.store.source_description())
            .field("loaded", &self.store.is_loaded())
            .field("generation", &self.store.generation())
            .finish()
    }
}

impl PortfolioAnalytics {
    /// Serve the JSON snapshot at `settings.data_path`.
    pub fn new(settings: &Settings) -> Self {
        Self::with_source(JsonFileSource::new(settings.data_path.clone()))
    }

    /// Settings from the environment (`PORTFOLIO_DATA_PATH`), else defaults.
    pub fn from_env() -> Self {
        Self::new(&Settings::from_env())
    }

    /// Serve snapshot JSON already held in memory.
    pub fn from_json(json: impl Into<String>) -> Self {
        Self::with_source(InMemorySource::new(json))
    }

    /// Serve snapshots from any source.
    pub fn with_source(source: impl SnapshotSource + 'static) -> Self {
        Self {
            store: SnapshotStore::new(Box::new(source)),
            holding_service: HoldingService::new(),
            allocation_service: AllocationService::new(),
            performance_service: PerformanceService::new(),
            summary_service: SummaryService::new(),
        }
    }

    // ── Views ───────────────────────────────────────────────────────

    /// Every holding with value and gain/loss filled in.
    pub fn holdings(&self) -> Result<Vec<Holding>, ViewError> {
        let snapshot = self.store.load();
        self.holding_service
            .enrich(&snapshot.holdings)
            .map_err(|e| ViewError::new(View::Holdings, e))
    }

    /// Value breakdown by sector and by market-cap tier.
    pub fn allocation(&self) -> Result<Allocation, ViewError> {
        let snapshot = self.store.load();
        self.allocation_service
            .aggregate_with(&snapshot, || self.holding_service.enrich(&snapshot.holdings))
            .map_err(|e| ViewError::new(View::Allocation, e))
    }

    /// Timeline against the benchmark and commodity, with trailing returns.
    pub fn performance(&self) -> Result<Performance, ViewError> {
        let snapshot = self.store.load();
        self.performance_service
            .build_performance(&snapshot.historical_performance)
            .map_err(|e| ViewError::new(View::Performance, e))
    }

    /// Totals, best/worst performers, diversification and risk.
    pub fn summary(&self) -> Result<Summary, ViewError> {
        let snapshot = self.store.load();
        self.holding_service
            .enrich(&snapshot.holdings)
            .and_then(|holdings| self.summary_service.summarize(&holdings))
            .map_err(|e| ViewError::new(View::Summary, e))
    }

    /// Render one view as pretty-printed JSON for the transport layer.
    pub fn view_json(&self, view: View) -> Result<String, ViewError> {
        let rendered = match view {
            View::Holdings => to_json(&self.holdings()?),
            View::Allocation => to_json(&self.allocation()?),
            View::Performance => to_json(&self.performance()?),
            View::Summary => to_json(&self.summary()?),
        };
        rendered.map_err(|e| ViewError::new(view, e))
    }

    // ── Snapshot lifecycle ──────────────────────────────────────────

    /// Drop the cached snapshot; the next view re-reads the source.
    pub fn reload(&self) {
        self.store.invalidate();
    }

    /// The snapshot currently served, loading it if needed.
    pub fn snapshot(&self) -> Arc<RawSnapshot> {
        self.store.load()
    }

    /// Import provenance of the snapshot currently served.
    pub fn metadata(&self) -> SnapshotMetadata {
        self.store.load().metadata.clone()
    }

    /// Whether the built-in fallback is being served.
    pub fn is_using_fallback(&self) -> bool {
        self.store.load().is_fallback()
    }

    /// Number of times the backing source has been read.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.store.generation()
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, CoreError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CoreError::Serialization(format!("Failed to serialize view: {e}")))
}
