//! Plain-text rendering of dashboard publications.

use std::fmt::Write as _;

use crash_map_analytics_models::Summaries;
use crash_map_crash_models::InjuryCategory;
use crash_map_dashboard::{FactorView, MapView, Publication, ViewConsumer};

/// Prints each publication to stdout as a set of text tables.
pub struct TerminalView {
    top: usize,
}

impl TerminalView {
    /// Creates a view that lists at most `top` rows per ranked chart.
    #[must_use]
    pub const fn new(top: usize) -> Self {
        Self { top }
    }
}

impl ViewConsumer for TerminalView {
    fn name(&self) -> &str {
        "terminal"
    }

    fn render(&self, publication: &Publication) {
        println!("{}", format_publication(publication, self.top));
    }
}

/// Formats a publication as text. Ranked charts are cut to `top` rows.
#[must_use]
pub fn format_publication(publication: &Publication, top: usize) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "== {} of {} records ==",
        publication.record_count, publication.total_records
    );
    if !publication.filters.is_empty() {
        let chain: Vec<String> = publication.filters.iter().map(ToString::to_string).collect();
        let _ = writeln!(out, "Filters: {}", chain.join(" > "));
    }
    if !publication.selected_vehicles.is_empty() {
        let _ = writeln!(
            out,
            "Selected vehicles: {}",
            publication.selected_vehicles.join(", ")
        );
    }

    write_map(&mut out, &publication.map);
    write_factors(&mut out, &publication.summaries, &publication.factor_view, top);
    write_vehicles(&mut out, &publication.summaries, top);
    write_hours(&mut out, &publication.summaries);

    out
}

fn write_map(out: &mut String, map: &MapView) {
    match map {
        MapView::Pending => {
            let _ = writeln!(out, "\nMap: waiting for borough boundaries");
        }
        MapView::Choropleth { shades, .. } => {
            let _ = writeln!(out, "\nBoroughs:");
            for shade in shades {
                let _ = writeln!(out, "  {:<16} {:>8}", shade.name, shade.count);
            }
        }
        MapView::Points { cloud } => {
            let _ = writeln!(out, "\nMap: {} located crashes", cloud.points.len());
            if let Some(extent) = &cloud.extent {
                let _ = writeln!(
                    out,
                    "  lon {:.4} to {:.4}, lat {:.4} to {:.4}",
                    extent.min_longitude,
                    extent.max_longitude,
                    extent.min_latitude,
                    extent.max_latitude
                );
            }
        }
    }
}

fn write_factors(out: &mut String, summaries: &Summaries, view: &FactorView, top: usize) {
    let mut factors: Vec<(&String, &u64)> = summaries.factors.iter().collect();
    factors.sort_by(|a, b| b.1.cmp(a.1));

    let _ = writeln!(out, "\nContributing factors:");
    if factors.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for (factor, count) in factors.into_iter().take(top) {
        let _ = write!(out, "  {factor:<40} {count:>8}");
        if let FactorView::Pies { breakdowns } = view
            && let Some(breakdown) = breakdowns.iter().find(|b| &b.factor == factor)
        {
            let slices: Vec<String> = breakdown
                .vehicles
                .iter()
                .map(|v| format!("{} {}", v.vehicle_type, v.count))
                .collect();
            let _ = write!(out, "  [{}]", slices.join(", "));
        }
        let _ = writeln!(out);
    }
}

fn write_vehicles(out: &mut String, summaries: &Summaries, top: usize) {
    let _ = writeln!(out, "\nVehicle types:");
    for vehicle in summaries.vehicles.iter().take(top) {
        let _ = writeln!(out, "  {:<40} {:>8}", vehicle.vehicle_type, vehicle.count);
    }
}

fn write_hours(out: &mut String, summaries: &Summaries) {
    let _ = writeln!(out, "\nInjuries by hour (total, peak hour):");
    for category in InjuryCategory::all() {
        let Some(buckets) = summaries.hours.get(category) else {
            continue;
        };
        let peak = buckets
            .iter()
            .filter(|(_, value)| *value > 0.0)
            .max_by(|a, b| a.1.total_cmp(&b.1));
        match peak {
            Some((hour, _)) => {
                let _ = writeln!(
                    out,
                    "  {:<20} {:>8} {hour:02}:00",
                    category.as_ref(),
                    buckets.total()
                );
            }
            None => {
                let _ = writeln!(out, "  {:<20} {:>8} -", category.as_ref(), 0);
            }
        }
    }
}
