#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Cross-filtering crash dashboard session.
//!
//! A [`Dashboard`] owns one [`RecordStore`], one [`FilterEngine`], and one
//! [`ViewNotifier`]. Every load, filter, and map toggle recomputes all
//! summaries from the current working set and publishes them together, so
//! the views never disagree about which records they describe.

pub mod config;
pub mod filter;
pub mod notify;
pub mod store;

use crash_map_analytics::{breakdown_by_selected_vehicles, collect_points, summarize};
use crash_map_analytics_models::{AggregationOptions, FactorBreakdown, PointCloud, Summaries};
use crash_map_crash_models::CrashRecord;
use crash_map_geography::{BoroughBoundaries, BoroughShade, BoundingBox, join_counts};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use config::{DashboardConfig, MapMode};
pub use filter::{Filter, FilterEngine, FilterState, ParseFilterError};
pub use notify::{ViewConsumer, ViewNotifier};
pub use store::RecordStore;

/// Errors raised while setting up a dashboard.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// I/O error reading the configuration file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed configuration file.
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

/// What the map view shows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MapView {
    /// Boundaries have not arrived yet.
    #[default]
    Pending,
    /// Borough outlines shaded by crash count.
    Choropleth {
        /// One shade per borough outline.
        shades: Vec<BoroughShade>,
        /// Extent of all outlines.
        bounds: Option<BoundingBox>,
    },
    /// One point per located crash.
    Points {
        /// Located crashes and their extent.
        cloud: PointCloud,
    },
}

/// How the factor chart draws its bubbles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FactorView {
    /// Plain bubbles sized by factor count.
    #[default]
    Bubbles,
    /// Each bubble split by the selected vehicle types.
    Pies {
        /// One breakdown per factor.
        breakdowns: Vec<FactorBreakdown>,
    },
}

/// One consistent snapshot pushed to every view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    /// Increments with every publication of a session, starting at 1.
    pub sequence: u64,
    /// The four chart summaries.
    pub summaries: Summaries,
    /// Records in the working set.
    pub record_count: usize,
    /// Records originally loaded.
    pub total_records: usize,
    /// Active filters, oldest first.
    pub filters: Vec<Filter>,
    /// Selected vehicle types.
    pub selected_vehicles: Vec<String>,
    /// Current map mode.
    pub map_mode: MapMode,
    /// Map view content.
    pub map: MapView,
    /// Factor chart content.
    pub factor_view: FactorView,
}

/// One interactive dashboard session.
#[derive(Debug)]
pub struct Dashboard {
    config: DashboardConfig,
    options: AggregationOptions,
    store: RecordStore,
    engine: FilterEngine,
    notifier: ViewNotifier,
    map_mode: MapMode,
    sequence: u64,
    last: Option<Publication>,
}

impl Dashboard {
    /// Creates an empty session. Nothing is published until
    /// [`Self::load`] or [`Self::load_records`] is called.
    #[must_use]
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            options: config.aggregation_options(),
            engine: FilterEngine::new(config.multi_select),
            map_mode: config.map_mode,
            store: RecordStore::new(),
            notifier: ViewNotifier::new(),
            sequence: 0,
            last: None,
            config,
        }
    }

    /// Adds a view that receives every subsequent publication.
    pub fn register(&mut self, consumer: Box<dyn ViewConsumer>) {
        self.notifier.register(consumer);
    }

    /// Seeds the session with records and boundaries and publishes the
    /// unfiltered summaries. Later calls are ignored.
    pub fn load(&mut self, records: Vec<CrashRecord>, boundaries: BoroughBoundaries) {
        if self.store.load(records, Some(boundaries)) {
            self.refresh();
        }
    }

    /// Seeds the session with records only. The map stays
    /// [`MapView::Pending`] until [`Self::attach_boundaries`].
    pub fn load_records(&mut self, records: Vec<CrashRecord>) {
        if self.store.load(records, None) {
            self.refresh();
        }
    }

    /// Supplies borough boundaries and republishes.
    pub fn attach_boundaries(&mut self, boundaries: BoroughBoundaries) {
        log::debug!("Attaching {} borough boundaries", boundaries.len());
        self.store.attach_boundaries(boundaries);
        if self.store.is_loaded() {
            self.refresh();
        }
    }

    /// Narrows the working set and republishes. Ignored before load.
    pub fn apply(&mut self, filter: Filter) {
        if !self.store.is_loaded() {
            log::warn!("Ignoring filter {filter} before records are loaded");
            return;
        }
        self.engine.apply(&mut self.store, filter);
        self.refresh();
    }

    /// Keeps records in `name`.
    pub fn filter_by_borough(&mut self, name: impl Into<String>) {
        self.apply(Filter::Borough(name.into()));
    }

    /// Keeps records with `factor` in either slot.
    pub fn filter_by_factor(&mut self, factor: impl Into<String>) {
        self.apply(Filter::Factor(factor.into()));
    }

    /// Keeps records with `vehicle_type` in either slot and, with
    /// multi-select on, adds it to the selection.
    pub fn filter_by_vehicle(&mut self, vehicle_type: impl Into<String>) {
        self.apply(Filter::Vehicle(vehicle_type.into()));
    }

    /// Keeps records that happened during `hour`.
    pub fn filter_by_hour(&mut self, hour: u8) {
        self.apply(Filter::Hour(hour));
    }

    /// Switches between the borough choropleth and the point map. The
    /// working set is unchanged.
    pub fn toggle_map_mode(&mut self) {
        self.map_mode = self.map_mode.toggled();
        log::debug!("Map mode is now {}", self.map_mode);
        if self.store.is_loaded() {
            self.refresh();
        }
    }

    /// The current working set.
    #[must_use]
    pub fn current(&self) -> &[CrashRecord] {
        self.store.current()
    }

    /// Filters applied so far and the vehicle selection.
    #[must_use]
    pub const fn filters(&self) -> &FilterState {
        self.engine.state()
    }

    /// Current map mode.
    #[must_use]
    pub const fn map_mode(&self) -> MapMode {
        self.map_mode
    }

    /// Session configuration.
    #[must_use]
    pub const fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// The most recent publication, if any.
    #[must_use]
    pub const fn last_publication(&self) -> Option<&Publication> {
        self.last.as_ref()
    }

    /// Builds a publication for the current state without sending it.
    #[must_use]
    pub fn snapshot(&self) -> Publication {
        let records = self.store.current();
        let summaries = summarize(records, &self.options);
        let state = self.engine.state();

        let map = match (self.map_mode, self.store.boundaries()) {
            (MapMode::Points, _) => MapView::Points {
                cloud: collect_points(records),
            },
            (MapMode::Boroughs, Some(boundaries)) => MapView::Choropleth {
                shades: join_counts(boundaries, &summaries.boroughs),
                bounds: boundaries.bounding_box(),
            },
            (MapMode::Boroughs, None) => MapView::Pending,
        };

        let factor_view = if self.engine.multi_select()
            && state.selected_vehicles.len() >= self.config.pie_threshold
        {
            FactorView::Pies {
                breakdowns: breakdown_by_selected_vehicles(
                    records,
                    &summaries.factors,
                    &state.selected_vehicles,
                ),
            }
        } else {
            FactorView::Bubbles
        };

        Publication {
            sequence: self.sequence,
            record_count: records.len(),
            total_records: self.store.total_loaded(),
            filters: state.predicates.clone(),
            selected_vehicles: state.selected_vehicles.clone(),
            map_mode: self.map_mode,
            map,
            factor_view,
            summaries,
        }
    }

    fn refresh(&mut self) {
        self.sequence += 1;
        let publication = self.snapshot();

        log::info!(
            "Publication #{}: {} of {} records, {} filters",
            publication.sequence,
            publication.record_count,
            publication.total_records,
            publication.filters.len()
        );

        self.notifier.publish(&publication);
        self.last = Some(publication);
    }
}
