//! Located crashes for the point-level map view.

use crash_map_analytics_models::{PointCloud, PointExtent};
use crash_map_crash_models::CrashRecord;

/// Collects the coordinates of every record that has both longitude and
/// latitude, along with their extent.
#[must_use]
pub fn collect_points(records: &[CrashRecord]) -> PointCloud {
    let points: Vec<[f64; 2]> = records
        .iter()
        .filter_map(CrashRecord::coordinates)
        .map(|(lon, lat)| [lon, lat])
        .collect();

    let extent = points.iter().fold(None, |acc: Option<PointExtent>, [lon, lat]| {
        Some(acc.map_or(
            PointExtent {
                min_longitude: *lon,
                max_longitude: *lon,
                min_latitude: *lat,
                max_latitude: *lat,
            },
            |e| PointExtent {
                min_longitude: e.min_longitude.min(*lon),
                max_longitude: e.max_longitude.max(*lon),
                min_latitude: e.min_latitude.min(*lat),
                max_latitude: e.max_latitude.max(*lat),
            },
        ))
    });

    PointCloud { points, extent }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn located(lon: Option<f64>, lat: Option<f64>) -> CrashRecord {
        CrashRecord {
            longitude: lon,
            latitude: lat,
            ..CrashRecord::default()
        }
    }

    #[test]
    fn skips_unlocated_records() {
        let records = vec![
            located(Some(-73.9), Some(40.8)),
            located(None, Some(40.7)),
            located(Some(-73.7), Some(40.6)),
        ];

        let cloud = collect_points(&records);

        assert_eq!(cloud.points, vec![[-73.9, 40.8], [-73.7, 40.6]]);
        let extent = cloud.extent.unwrap();
        assert!((extent.min_longitude - -73.9).abs() < f64::EPSILON);
        assert!((extent.max_longitude - -73.7).abs() < f64::EPSILON);
        assert!((extent.min_latitude - 40.6).abs() < f64::EPSILON);
        assert!((extent.max_latitude - 40.8).abs() < f64::EPSILON);
    }

    #[test]
    fn no_points_no_extent() {
        let cloud = collect_points(&[located(None, None)]);
        assert!(cloud.points.is_empty());
        assert!(cloud.extent.is_none());
    }
}
