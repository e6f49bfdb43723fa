//! The four per-facet aggregators.
//!
//! Each is a single pass over the record set and accepts an empty slice.
//!
//! Factor and vehicle slots are counted independently: a record whose two
//! slots hold the same value contributes two to that bucket.

use std::collections::BTreeMap;

use crash_map_analytics_models::{
    BoroughCounts, FactorCounts, HourBuckets, HourlyInjuries, VehicleCount, VehicleVocabulary,
};
use crash_map_crash_models::{CrashRecord, InjuryCategory};

/// Counts records per borough. Records without a borough are not counted.
#[must_use]
pub fn aggregate_by_borough(records: &[CrashRecord]) -> BoroughCounts {
    let mut counts = BoroughCounts::new();
    for borough in records.iter().filter_map(|r| r.borough.as_deref()) {
        *counts.entry(borough.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Counts contributing-factor slot occurrences, skipping `sentinel`.
#[must_use]
pub fn aggregate_by_factor(records: &[CrashRecord], sentinel: &str) -> FactorCounts {
    let mut counts = FactorCounts::new();
    for factor in records
        .iter()
        .flat_map(CrashRecord::factors)
        .flatten()
        .filter(|f| *f != sentinel)
    {
        *counts.entry(factor.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Counts vehicle-type slot occurrences, largest first.
///
/// Blank slots never count. With [`VehicleVocabulary::Bounded`] every
/// listed type is present (possibly zero) and unknown types are dropped;
/// with [`VehicleVocabulary::Open`] each new type gets a bucket. Ties keep
/// the order in which buckets were created.
#[must_use]
pub fn aggregate_by_vehicle(
    records: &[CrashRecord],
    vocabulary: &VehicleVocabulary,
) -> Vec<VehicleCount> {
    let mut counts: Vec<VehicleCount> = Vec::new();
    let mut index: BTreeMap<String, usize> = BTreeMap::new();

    let bounded = match vocabulary {
        VehicleVocabulary::Bounded { types } => {
            for vehicle_type in types {
                if !index.contains_key(vehicle_type) {
                    index.insert(vehicle_type.clone(), counts.len());
                    counts.push(VehicleCount {
                        vehicle_type: vehicle_type.clone(),
                        count: 0,
                    });
                }
            }
            true
        }
        VehicleVocabulary::Open => false,
    };

    for vehicle_type in records
        .iter()
        .flat_map(CrashRecord::vehicles)
        .flatten()
        .filter(|v| !v.trim().is_empty())
    {
        if let Some(&i) = index.get(vehicle_type) {
            counts[i].count += 1;
        } else if !bounded {
            index.insert(vehicle_type.to_string(), counts.len());
            counts.push(VehicleCount {
                vehicle_type: vehicle_type.to_string(),
                count: 1,
            });
        }
    }

    // Stable sort: equal counts stay in creation order.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Sums injury counts per category into the record's crash hour.
///
/// Every category has all 24 buckets, zero when nothing contributed.
/// Records without a crash hour are skipped, as are categories whose
/// value was not recorded or is `NaN`.
#[must_use]
pub fn aggregate_by_hour_and_injury_category(records: &[CrashRecord]) -> HourlyInjuries {
    let mut hours: HourlyInjuries = InjuryCategory::all()
        .iter()
        .map(|c| (*c, HourBuckets::default()))
        .collect();

    for record in records {
        let Some(hour) = record.crash_hour else {
            continue;
        };
        for (category, value) in record.injuries.iter() {
            if value.is_nan() {
                continue;
            }
            if let Some(buckets) = hours.get_mut(&category) {
                buckets.add(hour, value);
            }
        }
    }

    hours
}

#[cfg(test)]
mod tests {
    use crash_map_crash_models::{FACTOR_NONE, InjuryCounts};

    use super::*;

    fn record(borough: Option<&str>, factor_1: &str, factor_2: &str) -> CrashRecord {
        CrashRecord {
            borough: borough.map(ToString::to_string),
            contributing_factor_1: Some(factor_1.to_string()),
            contributing_factor_2: Some(factor_2.to_string()),
            ..CrashRecord::default()
        }
    }

    fn vehicles(v1: Option<&str>, v2: Option<&str>) -> CrashRecord {
        CrashRecord {
            vehicle_type_1: v1.map(ToString::to_string),
            vehicle_type_2: v2.map(ToString::to_string),
            ..CrashRecord::default()
        }
    }

    fn scenario() -> Vec<CrashRecord> {
        vec![
            record(Some("BRONX"), "Unsafe Speed", FACTOR_NONE),
            record(Some("BRONX"), FACTOR_NONE, FACTOR_NONE),
            record(Some("QUEENS"), "Unsafe Speed", "Unsafe Speed"),
        ]
    }

    #[test]
    fn scenario_boroughs() {
        let counts = aggregate_by_borough(&scenario());
        assert_eq!(
            counts,
            BTreeMap::from([("BRONX".to_string(), 2), ("QUEENS".to_string(), 1)])
        );
    }

    #[test]
    fn scenario_factors_double_count_identical_slots() {
        let counts = aggregate_by_factor(&scenario(), FACTOR_NONE);
        assert_eq!(counts, BTreeMap::from([("Unsafe Speed".to_string(), 3)]));
    }

    #[test]
    fn identical_factor_slots_count_twice() {
        let records = vec![record(None, "Driver Inattention", "Driver Inattention")];
        let counts = aggregate_by_factor(&records, FACTOR_NONE);
        assert_eq!(counts.get("Driver Inattention"), Some(&2));
    }

    #[test]
    fn borough_total_matches_records_with_borough() {
        let mut records = scenario();
        records.push(record(None, FACTOR_NONE, FACTOR_NONE));

        let total: u64 = aggregate_by_borough(&records).values().sum();

        let with_borough = records.iter().filter(|r| r.borough.is_some()).count() as u64;
        assert_eq!(total, with_borough);
        assert!(total <= records.len() as u64);
    }

    #[test]
    fn factor_buckets_match_slot_pairs() {
        let records = vec![
            record(None, "Unsafe Speed", "Driver Inattention"),
            record(None, "Driver Inattention", "Driver Inattention"),
            record(None, FACTOR_NONE, "Unsafe Speed"),
        ];

        let counts = aggregate_by_factor(&records, FACTOR_NONE);

        for (factor, count) in &counts {
            let pairs = records
                .iter()
                .flat_map(CrashRecord::factors)
                .filter(|slot| *slot == Some(factor.as_str()))
                .count() as u64;
            assert_eq!(*count, pairs, "{factor}");
        }
        assert!(!counts.contains_key(FACTOR_NONE));
    }

    #[test]
    fn custom_sentinel_is_skipped() {
        let records = vec![record(None, "Unspecified", "Unsafe Speed")];
        let counts = aggregate_by_factor(&records, "Unspecified");
        assert_eq!(counts, BTreeMap::from([("Unsafe Speed".to_string(), 1)]));
    }

    #[test]
    fn empty_input_yields_empty_summaries() {
        assert!(aggregate_by_borough(&[]).is_empty());
        assert!(aggregate_by_factor(&[], FACTOR_NONE).is_empty());
        assert!(aggregate_by_vehicle(&[], &VehicleVocabulary::Open).is_empty());

        let hours = aggregate_by_hour_and_injury_category(&[]);
        assert_eq!(hours.len(), InjuryCategory::all().len());
        assert!(hours.values().all(|b| b.total() == 0.0));
    }

    #[test]
    fn bounded_vehicles_keep_zero_buckets_and_drop_unknowns() {
        let records = vec![
            vehicles(Some("Taxi"), Some("Tractor")),
            vehicles(Some("Taxi"), Some("")),
            vehicles(Some("Bus"), None),
        ];
        let vocabulary = VehicleVocabulary::Bounded {
            types: vec!["Sedan".to_string(), "Bus".to_string(), "Taxi".to_string()],
        };

        let counts = aggregate_by_vehicle(&records, &vocabulary);

        let pairs: Vec<(&str, u64)> = counts
            .iter()
            .map(|c| (c.vehicle_type.as_str(), c.count))
            .collect();
        assert_eq!(pairs, vec![("Taxi", 2), ("Bus", 1), ("Sedan", 0)]);
    }

    #[test]
    fn default_bounded_vocabulary_lists_every_known_type() {
        let counts = aggregate_by_vehicle(&[], &VehicleVocabulary::default());
        assert_eq!(
            counts.len(),
            crash_map_crash_models::DEFAULT_VEHICLE_TYPES.len()
        );
        assert!(counts.iter().all(|c| c.count == 0));
        assert_eq!(counts[0].vehicle_type, "Sedan");
    }

    #[test]
    fn open_vehicles_accept_any_non_empty_type() {
        let records = vec![
            vehicles(Some("Tractor"), Some("Sedan")),
            vehicles(Some("Sedan"), Some("  ")),
            vehicles(Some("Sedan"), Some("Sedan")),
            vehicles(Some("Forklift"), None),
        ];

        let counts = aggregate_by_vehicle(&records, &VehicleVocabulary::Open);

        let pairs: Vec<(&str, u64)> = counts
            .iter()
            .map(|c| (c.vehicle_type.as_str(), c.count))
            .collect();
        assert_eq!(pairs, vec![("Sedan", 4), ("Tractor", 1), ("Forklift", 1)]);
    }

    #[test]
    fn hours_are_seeded_and_summed() {
        let records = vec![
            CrashRecord {
                crash_hour: Some(8),
                injuries: InjuryCounts::new()
                    .with(InjuryCategory::PersonsInjured, 2.0)
                    .with(InjuryCategory::CyclistsKilled, 1.0),
                ..CrashRecord::default()
            },
            CrashRecord {
                crash_hour: Some(8),
                injuries: InjuryCounts::new()
                    .with(InjuryCategory::PersonsInjured, 1.0)
                    .with(InjuryCategory::PedestriansInjured, f64::NAN),
                ..CrashRecord::default()
            },
        ];

        let hours = aggregate_by_hour_and_injury_category(&records);

        for category in InjuryCategory::all() {
            assert_eq!(hours[category].iter().count(), 24, "{category}");
        }
        assert_eq!(hours[&InjuryCategory::PersonsInjured].get(8), Some(3.0));
        assert_eq!(hours[&InjuryCategory::PersonsInjured].get(9), Some(0.0));
        assert_eq!(hours[&InjuryCategory::CyclistsKilled].get(8), Some(1.0));
        assert_eq!(hours[&InjuryCategory::PedestriansInjured].total(), 0.0);
    }

    #[test]
    fn unparsed_hour_only_affects_hour_summary() {
        let records = vec![CrashRecord {
            borough: Some("BRONX".to_string()),
            crash_hour: None,
            contributing_factor_1: Some("Unsafe Speed".to_string()),
            injuries: InjuryCounts::new().with(InjuryCategory::PersonsInjured, 4.0),
            ..CrashRecord::default()
        }];

        let hours = aggregate_by_hour_and_injury_category(&records);

        assert!(hours.values().all(|b| b.total() == 0.0));
        assert_eq!(aggregate_by_borough(&records).get("BRONX"), Some(&1));
        assert_eq!(
            aggregate_by_factor(&records, FACTOR_NONE).get("Unsafe Speed"),
            Some(&1)
        );
    }

    #[test]
    fn aggregators_are_idempotent() {
        let records = scenario();
        assert_eq!(aggregate_by_borough(&records), aggregate_by_borough(&records));
        assert_eq!(
            aggregate_by_factor(&records, FACTOR_NONE),
            aggregate_by_factor(&records, FACTOR_NONE)
        );
        assert_eq!(
            aggregate_by_vehicle(&records, &VehicleVocabulary::Open),
            aggregate_by_vehicle(&records, &VehicleVocabulary::Open)
        );
        assert_eq!(
            aggregate_by_hour_and_injury_category(&records),
            aggregate_by_hour_and_injury_category(&records)
        );
    }
}
