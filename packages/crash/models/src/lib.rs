#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crash record types shared across the crash-map system.
//!
//! A [`CrashRecord`] is one observed traffic crash as read from the crash
//! dataset. Records carry two independent contributing-factor slots and
//! two independent vehicle-type slots, plus a count per
//! [`InjuryCategory`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Placeholder stored in a contributing-factor slot when no factor applies.
pub const FACTOR_NONE: &str = "none";

/// Number of hour-of-day buckets (0 through 23).
pub const HOURS_PER_DAY: usize = 24;

/// Vehicle types tracked when the vehicle vocabulary is bounded.
///
/// Order matters: it is the tie-break order for equal counts.
pub const DEFAULT_VEHICLE_TYPES: &[&str] = &[
    "Sedan",
    "Station wagon",
    "Sport utility vehicle / Mini van",
    "Bike",
    "E-bike/E-scooter",
    "Box truck",
    "Bus",
    "Pick-up truck",
    "Taxi",
    "Motorcycle",
    "Ambulance",
];

/// Injury categories recorded per crash: who was hurt, and whether they
/// were injured or killed.
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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum InjuryCategory {
    /// All persons injured
    PersonsInjured,
    /// All persons killed
    PersonsKilled,
    /// Pedestrians injured
    PedestriansInjured,
    /// Pedestrians killed
    PedestriansKilled,
    /// Cyclists injured
    CyclistsInjured,
    /// Cyclists killed
    CyclistsKilled,
    /// Motorists injured
    MotoristsInjured,
    /// Motorists killed
    MotoristsKilled,
}

impl InjuryCategory {
    /// Returns the crash dataset column that holds this category's count.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::PersonsInjured => "NUMBER OF PERSONS INJURED",
            Self::PersonsKilled => "NUMBER OF PERSONS KILLED",
            Self::PedestriansInjured => "NUMBER OF PEDESTRIANS INJURED",
            Self::PedestriansKilled => "NUMBER OF PEDESTRIANS KILLED",
            Self::CyclistsInjured => "NUMBER OF CYCLIST INJURED",
            Self::CyclistsKilled => "NUMBER OF CYCLIST KILLED",
            Self::MotoristsInjured => "NUMBER OF MOTORIST INJURED",
            Self::MotoristsKilled => "NUMBER OF MOTORIST KILLED",
        }
    }

    /// Returns `true` for the `*_KILLED` categories.
    #[must_use]
    pub const fn is_fatal(self) -> bool {
        matches!(
            self,
            Self::PersonsKilled
                | Self::PedestriansKilled
                | Self::CyclistsKilled
                | Self::MotoristsKilled
        )
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::PersonsInjured,
            Self::PersonsKilled,
            Self::PedestriansInjured,
            Self::PedestriansKilled,
            Self::CyclistsInjured,
            Self::CyclistsKilled,
            Self::MotoristsInjured,
            Self::MotoristsKilled,
        ]
    }
}

/// Parsed injury counts for a single crash.
///
/// A category is absent when its source field was missing or did not parse
/// as a number. Absent and zero are distinct: absent fields contribute
/// nothing to hourly sums.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InjuryCounts(BTreeMap<InjuryCategory, f64>);

impl InjuryCounts {
    /// Creates an empty set of counts.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Records the count for a category, replacing any previous value.
    pub fn set(&mut self, category: InjuryCategory, value: f64) {
        self.0.insert(category, value);
    }

    /// Builder-style variant of [`Self::set`].
    #[must_use]
    pub fn with(mut self, category: InjuryCategory, value: f64) -> Self {
        self.set(category, value);
        self
    }

    /// Returns the parsed count for a category, if one was recorded.
    #[must_use]
    pub fn get(&self, category: InjuryCategory) -> Option<f64> {
        self.0.get(&category).copied()
    }

    /// Iterates over the recorded categories in category order.
    pub fn iter(&self) -> impl Iterator<Item = (InjuryCategory, f64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }
}

/// One observed crash event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrashRecord {
    /// Borough name as it appears in the dataset (e.g. `"BRONX"`).
    pub borough: Option<String>,
    /// Hour of day (0-23) from the crash time. `None` when the time field
    /// is missing or unparseable.
    pub crash_hour: Option<u8>,
    /// First contributing factor, or [`FACTOR_NONE`].
    pub contributing_factor_1: Option<String>,
    /// Second contributing factor, or [`FACTOR_NONE`].
    pub contributing_factor_2: Option<String>,
    /// Vehicle type code of the first vehicle.
    pub vehicle_type_1: Option<String>,
    /// Vehicle type code of the second vehicle.
    pub vehicle_type_2: Option<String>,
    /// Injury and fatality counts.
    pub injuries: InjuryCounts,
    /// Longitude (WGS84).
    pub longitude: Option<f64>,
    /// Latitude (WGS84).
    pub latitude: Option<f64>,
}

impl CrashRecord {
    /// Both contributing-factor slots, in slot order.
    #[must_use]
    pub fn factors(&self) -> [Option<&str>; 2] {
        [
            self.contributing_factor_1.as_deref(),
            self.contributing_factor_2.as_deref(),
        ]
    }

    /// Both vehicle-type slots, in slot order.
    #[must_use]
    pub fn vehicles(&self) -> [Option<&str>; 2] {
        [self.vehicle_type_1.as_deref(), self.vehicle_type_2.as_deref()]
    }

    /// Returns `true` if either factor slot equals `factor`.
    #[must_use]
    pub fn has_factor(&self, factor: &str) -> bool {
        self.factors().contains(&Some(factor))
    }

    /// Returns `true` if either vehicle slot equals `vehicle_type`.
    #[must_use]
    pub fn has_vehicle(&self, vehicle_type: &str) -> bool {
        self.vehicles().contains(&Some(vehicle_type))
    }

    /// Returns `(longitude, latitude)` when both are present.
    #[must_use]
    pub const fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.longitude, self.latitude) {
            (Some(lon), Some(lat)) => Some((lon, lat)),
            _ => None,
        }
    }
}
