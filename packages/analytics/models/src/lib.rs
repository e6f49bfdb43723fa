#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregate result types for the crash dashboard.
//!
//! Each chart consumes one summary: boroughs feed the choropleth, factors
//! the bubble chart, vehicles the bar chart, and hourly injury sums the
//! time-series chart. All four are bundled in [`Summaries`] so a single
//! publication is always internally consistent.

use std::collections::BTreeMap;

use crash_map_crash_models::{DEFAULT_VEHICLE_TYPES, FACTOR_NONE, HOURS_PER_DAY, InjuryCategory};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Crash count per borough name.
pub type BoroughCounts = BTreeMap<String, u64>;

/// Crash count per contributing factor (slot occurrences, not records).
pub type FactorCounts = BTreeMap<String, u64>;

/// Hourly injury sums per injury category.
pub type HourlyInjuries = BTreeMap<InjuryCategory, HourBuckets>;

/// A categorical dimension that can be aggregated and filtered on.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Facet {
    /// Borough name
    Borough,
    /// Contributing factor (either slot)
    Factor,
    /// Vehicle type (either slot)
    Vehicle,
    /// Hour of day
    Hour,
}

impl Facet {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Borough, Self::Factor, Self::Vehicle, Self::Hour]
    }
}

/// One bar of the vehicle chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleCount {
    /// Vehicle type code.
    #[serde(rename = "type")]
    pub vehicle_type: String,
    /// Slot occurrences of this type.
    pub count: u64,
}

/// Accumulated values for each hour of the day. All 24 hours are always
/// present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HourBuckets([f64; HOURS_PER_DAY]);

impl HourBuckets {
    /// Returns the value for `hour`, or `None` if `hour` is not 0-23.
    #[must_use]
    pub fn get(&self, hour: u8) -> Option<f64> {
        self.0.get(usize::from(hour)).copied()
    }

    /// Adds `value` into the bucket for `hour`. Hours outside 0-23 are
    /// ignored.
    pub fn add(&mut self, hour: u8, value: f64) {
        if let Some(bucket) = self.0.get_mut(usize::from(hour)) {
            *bucket += value;
        }
    }

    /// Sum over all hours.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Iterates `(hour, value)` pairs in hour order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, f64)> + '_ {
        (0u8..).zip(self.0.iter().copied())
    }

    /// Number of buckets (always 24).
    #[must_use]
    pub const fn len(&self) -> usize {
        HOURS_PER_DAY
    }

    /// Always `false`; present for symmetry with [`Self::len`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }
}

/// Which vehicle types the vehicle aggregator accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum VehicleVocabulary {
    /// Only the listed types are counted. Every listed type appears in the
    /// output, with zero when unseen; other values are dropped.
    Bounded {
        /// Accepted types, in tie-break order.
        #[serde(default = "default_vehicle_types")]
        types: Vec<String>,
    },
    /// Any non-empty type creates its own bucket.
    Open,
}

fn default_vehicle_types() -> Vec<String> {
    DEFAULT_VEHICLE_TYPES.iter().map(ToString::to_string).collect()
}

impl Default for VehicleVocabulary {
    fn default() -> Self {
        Self::Bounded {
            types: default_vehicle_types(),
        }
    }
}

/// Knobs shared by all aggregators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct AggregationOptions {
    /// Factor value meaning "not applicable"; never counted.
    pub factor_sentinel: String,
    /// Vehicle vocabulary mode.
    pub vehicles: VehicleVocabulary,
}

impl Default for AggregationOptions {
    fn default() -> Self {
        Self {
            factor_sentinel: FACTOR_NONE.to_string(),
            vehicles: VehicleVocabulary::default(),
        }
    }
}

/// The four chart summaries, computed from one record-set snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summaries {
    /// Crashes per borough.
    pub boroughs: BoroughCounts,
    /// Slot occurrences per contributing factor.
    pub factors: FactorCounts,
    /// Vehicle bars, largest first.
    pub vehicles: Vec<VehicleCount>,
    /// Hourly injury sums per category.
    pub hours: HourlyInjuries,
}

/// A factor bubble split into one slice per selected vehicle type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorBreakdown {
    /// Contributing factor.
    pub factor: String,
    /// The factor's total from [`Summaries::factors`]; sizes the bubble.
    pub count: u64,
    /// Records with this factor and each selected vehicle, in selection
    /// order.
    pub vehicles: Vec<VehicleCount>,
}

/// Longitude/latitude range of a point set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointExtent {
    /// Minimum longitude.
    pub min_longitude: f64,
    /// Maximum longitude.
    pub max_longitude: f64,
    /// Minimum latitude.
    pub min_latitude: f64,
    /// Maximum latitude.
    pub max_latitude: f64,
}

/// Located crashes for the point-level map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointCloud {
    /// `[longitude, latitude]` per located crash.
    pub points: Vec<[f64; 2]>,
    /// Range of `points`; `None` when there are none.
    pub extent: Option<PointExtent>,
}
