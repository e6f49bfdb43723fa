//! Factor × selected-vehicle cross-tabulation.
//!
//! Once two or more vehicle types are selected, each factor bubble is drawn
//! as a pie with one slice per selected type. Slices count records, not
//! slots: a record matches a factor if either factor slot holds it and a
//! vehicle if either vehicle slot holds it.

use std::collections::BTreeMap;

use crash_map_analytics_models::{FactorBreakdown, FactorCounts, VehicleCount};
use crash_map_crash_models::CrashRecord;

/// Splits every factor in `factors` by the `selected` vehicle types.
///
/// The result follows the key order of `factors`; each entry's slices
/// follow the order of `selected`.
#[must_use]
pub fn breakdown_by_selected_vehicles(
    records: &[CrashRecord],
    factors: &FactorCounts,
    selected: &[String],
) -> Vec<FactorBreakdown> {
    let mut slices: BTreeMap<&str, Vec<u64>> = factors
        .keys()
        .map(|f| (f.as_str(), vec![0; selected.len()]))
        .collect();

    for record in records {
        let matched: Vec<usize> = selected
            .iter()
            .enumerate()
            .filter(|(_, v)| record.has_vehicle(v))
            .map(|(i, _)| i)
            .collect();
        if matched.is_empty() {
            continue;
        }

        let [first, second] = record.factors();
        let distinct = [first, second.filter(|s| Some(*s) != first)];

        for factor in distinct.into_iter().flatten() {
            if let Some(counts) = slices.get_mut(factor) {
                for &i in &matched {
                    counts[i] += 1;
                }
            }
        }
    }

    factors
        .iter()
        .map(|(factor, count)| FactorBreakdown {
            factor: factor.clone(),
            count: *count,
            vehicles: selected
                .iter()
                .zip(slices.get(factor.as_str()).into_iter().flatten())
                .map(|(vehicle_type, n)| VehicleCount {
                    vehicle_type: vehicle_type.clone(),
                    count: *n,
                })
                .collect(),
        })
        .collect()
}
