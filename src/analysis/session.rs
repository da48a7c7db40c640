//! Memoized analytics over a shared catalog.
//!
//! Holds the current catalog and window and recomputes metrics only when
//! one of them changes. Results are identical to calling
//! [`compute_metrics`] directly.

use crate::analysis::{compute_fleet_summary, compute_metrics, DateWindow};
use crate::catalog::Catalog;
use crate::models::{FleetSummary, StudioMetrics};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
struct Computed {
    metrics: Vec<StudioMetrics>,
    summary: FleetSummary,
}

/// Catalog plus selected window, with cached results.
#[derive(Debug)]
pub struct AnalyticsSession {
    catalog: Arc<Catalog>,
    window: DateWindow,
    computed: Option<Computed>,
    generation: u64,
}

impl AnalyticsSession {
    pub fn new(catalog: Arc<Catalog>, window: DateWindow) -> Self {
        Self {
            catalog,
            window,
            computed: None,
            generation: 0,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[allow(dead_code)] // Accessor for callers that change windows
    pub fn window(&self) -> DateWindow {
        self.window
    }

    /// Number of times metrics have been recomputed.
    #[allow(dead_code)] // Exposed for cache diagnostics
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Select a new window. A no-op if the window is unchanged.
    #[allow(dead_code)] // The CLI picks one window per run
    pub fn set_window(&mut self, window: DateWindow) {
        if window != self.window {
            self.window = window;
            self.computed = None;
        }
    }

    /// Swap in a reloaded catalog. A no-op if it is the same catalog.
    #[allow(dead_code)] // Used when a catalog is reloaded in place
    pub fn replace_catalog(&mut self, catalog: Arc<Catalog>) {
        if !Arc::ptr_eq(&catalog, &self.catalog) {
            self.catalog = catalog;
            self.computed = None;
        }
    }

    /// Per-studio metrics for the current window, in catalog order.
    pub fn metrics(&mut self) -> &[StudioMetrics] {
        &self.ensure_computed().metrics
    }

    /// Fleet summary for the current window.
    pub fn summary(&mut self) -> &FleetSummary {
        &self.ensure_computed().summary
    }

    fn ensure_computed(&mut self) -> &Computed {
        let catalog = &self.catalog;
        let window = self.window;
        let generation = &mut self.generation;

        self.computed.get_or_insert_with(|| {
            *generation += 1;
            debug!(
                "Recomputing metrics for {} studios, window {} (generation {})",
                catalog.len(),
                window,
                generation
            );

            let metrics = compute_metrics(catalog.studios(), &window);
            let summary = compute_fleet_summary(&metrics);
            Computed { metrics, summary }
        })
    }
}
