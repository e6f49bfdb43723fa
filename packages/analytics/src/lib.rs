#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation engine for the crash dashboard.
//!
//! Pure functions that turn a record set into chart-ready summaries. None
//! of them fail: empty input produces empty (or zero-filled) output, and
//! unparsed fields were already dropped at ingest time.

pub mod aggregate;
pub mod breakdown;
pub mod points;

use crash_map_analytics_models::{AggregationOptions, Summaries};
use crash_map_crash_models::CrashRecord;

pub use aggregate::{
    aggregate_by_borough, aggregate_by_factor, aggregate_by_hour_and_injury_category,
    aggregate_by_vehicle,
};
pub use breakdown::breakdown_by_selected_vehicles;
pub use points::collect_points;

/// Computes all four summaries from the same snapshot of `records`.
#[must_use]
pub fn summarize(records: &[CrashRecord], options: &AggregationOptions) -> Summaries {
    let summaries = Summaries {
        boroughs: aggregate_by_borough(records),
        factors: aggregate_by_factor(records, &options.factor_sentinel),
        vehicles: aggregate_by_vehicle(records, &options.vehicles),
        hours: aggregate_by_hour_and_injury_category(records),
    };

    log::debug!(
        "Summarized {} records: {} boroughs, {} factors, {} vehicle types",
        records.len(),
        summaries.boroughs.len(),
        summaries.factors.len(),
        summaries.vehicles.len()
    );

    summaries
}

#[cfg(test)]
mod tests {
    use crash_map_analytics_models::VehicleVocabulary;

    use super::*;

    #[test]
    fn summarize_uses_options() {
        let records = vec![CrashRecord {
            borough: Some("QUEENS".to_string()),
            contributing_factor_1: Some("Unspecified".to_string()),
            vehicle_type_1: Some("Tractor".to_string()),
            crash_hour: Some(3),
            ..CrashRecord::default()
        }];
        let options = AggregationOptions {
            factor_sentinel: "Unspecified".to_string(),
            vehicles: VehicleVocabulary::Open,
        };

        let summaries = summarize(&records, &options);

        assert_eq!(summaries.boroughs.get("QUEENS"), Some(&1));
        assert!(summaries.factors.is_empty());
        assert_eq!(summaries.vehicles.len(), 1);
        assert_eq!(summaries.vehicles[0].vehicle_type, "Tractor");
        assert_eq!(summaries.hours.len(), 8);
    }

    #[test]
    fn summarize_empty() {
        let summaries = summarize(&[], &AggregationOptions::default());
        assert!(summaries.boroughs.is_empty());
        assert!(summaries.factors.is_empty());
        assert!(summaries.vehicles.iter().all(|v| v.count == 0));
        assert!(summaries.hours.values().all(|h| h.total() == 0.0));
    }
}
