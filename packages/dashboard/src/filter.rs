//! Cross-filter predicates and the one-way filter state machine.
//!
//! Filters only ever narrow the working set. There is no way to undo a
//! filter; starting over means starting a new [`crate::Dashboard`].

use std::fmt;
use std::str::FromStr;

use crash_map_analytics_models::Facet;
use crash_map_crash_models::{CrashRecord, HOURS_PER_DAY};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::RecordStore;

/// A single click on a chart element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "facet", content = "value", rename_all = "snake_case")]
pub enum Filter {
    /// Keep records whose borough equals the name.
    Borough(String),
    /// Keep records with the factor in either slot.
    Factor(String),
    /// Keep records with the vehicle type in either slot.
    Vehicle(String),
    /// Keep records whose crash hour equals the hour.
    Hour(u8),
}

impl Filter {
    /// The facet this filter narrows.
    #[must_use]
    pub const fn facet(&self) -> Facet {
        match self {
            Self::Borough(_) => Facet::Borough,
            Self::Factor(_) => Facet::Factor,
            Self::Vehicle(_) => Facet::Vehicle,
            Self::Hour(_) => Facet::Hour,
        }
    }

    /// Returns `true` if `record` passes this filter.
    #[must_use]
    pub fn matches(&self, record: &CrashRecord) -> bool {
        match self {
            Self::Borough(name) => record.borough.as_deref() == Some(name.as_str()),
            Self::Factor(factor) => record.has_factor(factor),
            Self::Vehicle(vehicle_type) => record.has_vehicle(vehicle_type),
            Self::Hour(hour) => record.crash_hour == Some(*hour),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Borough(value) | Self::Factor(value) | Self::Vehicle(value) => {
                write!(f, "{}={value}", self.facet())
            }
            Self::Hour(hour) => write!(f, "{}={hour}", self.facet()),
        }
    }
}

/// Error returned when a `facet=value` string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFilterError {
    /// No `=` separator.
    #[error("Expected facet=value, got '{0}'")]
    MissingSeparator(String),

    /// Facet name not recognized.
    #[error("Unknown facet '{0}' (expected borough, factor, vehicle or hour)")]
    UnknownFacet(String),

    /// Value is blank.
    #[error("Missing value for facet '{0}'")]
    EmptyValue(Facet),

    /// Hour is not an integer in 0-23.
    #[error("Invalid hour '{0}' (expected 0-23)")]
    InvalidHour(String),
}

impl FromStr for Filter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (facet, value) = s
            .split_once('=')
            .ok_or_else(|| ParseFilterError::MissingSeparator(s.to_string()))?;

        let facet: Facet = facet
            .trim()
            .parse()
            .map_err(|_| ParseFilterError::UnknownFacet(facet.trim().to_string()))?;

        let value = value.trim();
        if value.is_empty() {
            return Err(ParseFilterError::EmptyValue(facet));
        }

        Ok(match facet {
            Facet::Borough => Self::Borough(value.to_string()),
            Facet::Factor => Self::Factor(value.to_string()),
            Facet::Vehicle => Self::Vehicle(value.to_string()),
            Facet::Hour => {
                let hour = value
                    .parse::<u8>()
                    .ok()
                    .filter(|h| usize::from(*h) < HOURS_PER_DAY)
                    .ok_or_else(|| ParseFilterError::InvalidHour(value.to_string()))?;
                Self::Hour(hour)
            }
        })
    }
}

/// Everything the user has clicked so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Applied filters, oldest first.
    pub predicates: Vec<Filter>,
    /// Selected vehicle types in selection order, without duplicates.
    pub selected_vehicles: Vec<String>,
}

impl FilterState {
    /// Returns `true` if no filter has been applied.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.predicates.is_empty()
    }

    fn select_vehicle(&mut self, vehicle_type: &str) {
        if !self.selected_vehicles.iter().any(|v| v == vehicle_type) {
            self.selected_vehicles.push(vehicle_type.to_string());
        }
    }
}

/// Applies filters to a [`RecordStore`] and tracks the resulting state.
#[derive(Debug, Clone, Default)]
pub struct FilterEngine {
    state: FilterState,
    multi_select: bool,
}

impl FilterEngine {
    /// Creates an engine in the unfiltered state.
    #[must_use]
    pub fn new(multi_select: bool) -> Self {
        Self {
            state: FilterState::default(),
            multi_select,
        }
    }

    /// Narrows `store` to the records matching `filter` and records the
    /// transition. Returns the size of the new working set.
    pub fn apply(&mut self, store: &mut RecordStore, filter: Filter) -> usize {
        let before = store.len();
        let narrowed: Vec<CrashRecord> = store
            .current()
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect();
        let after = narrowed.len();

        log::debug!("Filter {filter}: {before} -> {after} records");

        store.replace(narrowed);

        if self.multi_select
            && let Filter::Vehicle(vehicle_type) = &filter
        {
            self.state.select_vehicle(vehicle_type);
        }
        self.state.predicates.push(filter);

        after
    }

    /// The filters applied so far and the vehicle selection.
    #[must_use]
    pub const fn state(&self) -> &FilterState {
        &self.state
    }

    /// Whether vehicle filters accumulate a selection.
    #[must_use]
    pub const fn multi_select(&self) -> bool {
        self.multi_select
    }
}
