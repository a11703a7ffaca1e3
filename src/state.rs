use std::path::Path;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use eframe::egui;

use credit_lens::dashboard::DashboardSnapshot;
use credit_lens::data::aggregate::{scalar_summary, SummaryStats};
use credit_lens::data::filter::{apply, FilterSpec, FilteredView};
use credit_lens::data::loader::load_file;
use credit_lens::data::model::CreditDataset;
use credit_lens::summary::{self, SummaryConfig, SummaryOutcome};

use crate::color::ChartPalette;

// ---------------------------------------------------------------------------
// Summary request lifecycle
// ---------------------------------------------------------------------------

/// `Idle -> Requesting -> Ready`, one request at a time. The worker thread
/// always sends an outcome (generated or fallback).
pub enum SummaryState {
    Idle,
    Requesting {
        rx: Receiver<SummaryOutcome>,
        filter: FilterSpec,
    },
    Ready {
        outcome: SummaryOutcome,
        filter: FilterSpec,
    },
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file is loaded). Never mutated.
    pub dataset: Option<CreditDataset>,

    /// Current filter selections.
    pub filter: FilterSpec,

    /// Unfiltered stats, computed once per dataset.
    pub baseline: Option<SummaryStats>,

    /// Charts for the current filter (cached).
    pub snapshot: Option<DashboardSnapshot>,

    pub palette: ChartPalette,

    pub summary_config: SummaryConfig,

    pub summary: SummaryState,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    pub show_raw_data: bool,
}

impl AppState {
    pub fn new(summary_config: SummaryConfig, palette: ChartPalette) -> Self {
        Self {
            dataset: None,
            filter: FilterSpec {
                purposes: Default::default(),
                housing_types: Default::default(),
                age_min: 0,
                age_max: 0,
                credit_min: 0,
                credit_max: 0,
            },
            baseline: None,
            snapshot: None,
            palette,
            summary_config,
            summary: SummaryState::Idle,
            status_message: None,
            show_raw_data: false,
        }
    }

    /// Load a file, replacing the current dataset on success.
    pub fn load_path(&mut self, path: &Path) {
        match load_file(path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Ingest a newly loaded dataset and reset filters to "everything".
    pub fn set_dataset(&mut self, dataset: CreditDataset) {
        self.filter = FilterSpec::all(&dataset);
        self.baseline = Some(scalar_summary(&FilteredView::full(&dataset)));
        self.dataset = Some(dataset);
        self.summary = SummaryState::Idle;
        self.status_message = None;
        self.refilter();
    }

    /// Recompute the snapshot after a filter change.
    pub fn refilter(&mut self) {
        let (Some(ds), Some(baseline)) = (&self.dataset, self.baseline) else {
            return;
        };
        let view = apply(ds, &self.filter);
        self.snapshot = Some(DashboardSnapshot::from_view(&view, self.filter.clone(), baseline));
    }

    pub fn reset_filters(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filter = FilterSpec::all(ds);
            self.refilter();
        }
    }

    /// Toggle a purpose in the allow-list.
    pub fn toggle_purpose(&mut self, purpose: &str) {
        if !self.filter.purposes.remove(purpose) {
            self.filter.purposes.insert(purpose.to_string());
        }
        self.refilter();
    }

    /// Toggle a housing type in the allow-list.
    pub fn toggle_housing(&mut self, housing: &str) {
        if !self.filter.housing_types.remove(housing) {
            self.filter.housing_types.insert(housing.to_string());
        }
        self.refilter();
    }

    pub fn select_all_purposes(&mut self, select: bool) {
        self.filter.purposes = match (&self.dataset, select) {
            (Some(ds), true) => ds.purposes().iter().cloned().collect(),
            _ => Default::default(),
        };
        self.refilter();
    }

    pub fn select_all_housing(&mut self, select: bool) {
        self.filter.housing_types = match (&self.dataset, select) {
            (Some(ds), true) => ds.housing_types().iter().cloned().collect(),
            _ => Default::default(),
        };
        self.refilter();
    }

    /// Start a background summary for the current snapshot. Charts keep
    /// rendering while it runs.
    pub fn request_summary(&mut self, ctx: &egui::Context) {
        if matches!(self.summary, SummaryState::Requesting { .. }) {
            return;
        }
        let Some(snapshot) = &self.snapshot else {
            return;
        };
        let stats = snapshot.stats;
        let config = self.summary_config.clone();
        let ctx = ctx.clone();
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || {
            let outcome = summary::summarize_with(&config, &stats);
            // The receiver is gone when a new dataset replaced the request.
            let _ = tx.send(outcome);
            ctx.request_repaint();
        });

        self.summary = SummaryState::Requesting {
            rx,
            filter: snapshot.filter.clone(),
        };
    }

    /// Collect a finished summary, if any.
    pub fn poll_summary(&mut self) {
        let next = match &self.summary {
            SummaryState::Requesting { rx, filter } => match rx.try_recv() {
                Ok(outcome) => Some(SummaryState::Ready {
                    outcome,
                    filter: filter.clone(),
                }),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => Some(SummaryState::Idle),
            },
            _ => None,
        };
        if let Some(next) = next {
            self.summary = next;
        }
    }

    /// Whether the shown summary was produced for different filters.
    pub fn summary_is_stale(&self) -> bool {
        match &self.summary {
            SummaryState::Ready { filter, .. } => *filter != self.filter,
            _ => false,
        }
    }
}
