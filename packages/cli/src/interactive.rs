//! Menu-driven exploration using `dialoguer`.
//!
//! Each pick applies one filter and the terminal view redraws. Filters only
//! narrow; quitting and starting again is the only way back.

use std::path::PathBuf;

use crash_map_analytics_models::Summaries;
use crash_map_dashboard::Dashboard;
use dialoguer::{Input, Select};

use crate::InputArgs;
use crate::views::TerminalView;

/// Rows shown per ranked chart.
const TOP_ROWS: usize = 15;

/// Actions available in the explore menu.
enum ExploreAction {
    Borough,
    Factor,
    Vehicle,
    Hour,
    ToggleMap,
    Quit,
}

impl ExploreAction {
    const ALL: &[Self] = &[
        Self::Borough,
        Self::Factor,
        Self::Vehicle,
        Self::Hour,
        Self::ToggleMap,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Borough => "Filter by borough",
            Self::Factor => "Filter by contributing factor",
            Self::Vehicle => "Filter by vehicle type",
            Self::Hour => "Filter by hour of day",
            Self::ToggleMap => "Toggle borough / point map",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the explore loop. Prompts for input paths when `inputs` is `None`.
///
/// # Errors
///
/// Returns an error if the inputs cannot be loaded or the terminal prompt
/// fails.
pub async fn run(inputs: Option<InputArgs>) -> Result<(), Box<dyn std::error::Error>> {
    let inputs = match inputs {
        Some(inputs) => inputs,
        None => prompt_inputs()?,
    };

    let mut dashboard =
        crate::open_dashboard(&inputs, vec![Box::new(TerminalView::new(TOP_ROWS))]).await?;

    let labels: Vec<&str> = ExploreAction::ALL
        .iter()
        .map(ExploreAction::label)
        .collect();

    loop {
        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        match ExploreAction::ALL[idx] {
            ExploreAction::Borough => {
                let choices = borough_choices(current_summaries(&dashboard));
                if let Some(borough) = pick("Borough", choices)? {
                    dashboard.filter_by_borough(borough);
                }
            }
            ExploreAction::Factor => {
                let choices = factor_choices(current_summaries(&dashboard));
                if let Some(factor) = pick("Contributing factor", choices)? {
                    dashboard.filter_by_factor(factor);
                }
            }
            ExploreAction::Vehicle => {
                let choices = vehicle_choices(current_summaries(&dashboard));
                if let Some(vehicle) = pick("Vehicle type", choices)? {
                    dashboard.filter_by_vehicle(vehicle);
                }
            }
            ExploreAction::Hour => {
                if let Some(hour) = pick_hour()? {
                    dashboard.filter_by_hour(hour);
                }
            }
            ExploreAction::ToggleMap => dashboard.toggle_map_mode(),
            ExploreAction::Quit => break,
        }
    }

    Ok(())
}

fn current_summaries(dashboard: &Dashboard) -> Option<&Summaries> {
    dashboard.last_publication().map(|p| &p.summaries)
}

/// `(label, value)` pairs for boroughs in the working set, largest first.
fn borough_choices(summaries: Option<&Summaries>) -> Vec<(String, String)> {
    let Some(summaries) = summaries else {
        return Vec::new();
    };
    ranked(summaries.boroughs.iter().map(|(name, count)| (name, *count)))
}

fn factor_choices(summaries: Option<&Summaries>) -> Vec<(String, String)> {
    let Some(summaries) = summaries else {
        return Vec::new();
    };
    ranked(summaries.factors.iter().map(|(name, count)| (name, *count)))
}

/// Vehicle types with at least one crash, in chart order.
fn vehicle_choices(summaries: Option<&Summaries>) -> Vec<(String, String)> {
    let Some(summaries) = summaries else {
        return Vec::new();
    };
    summaries
        .vehicles
        .iter()
        .filter(|v| v.count > 0)
        .map(|v| {
            (
                format!("{} ({})", v.vehicle_type, v.count),
                v.vehicle_type.clone(),
            )
        })
        .collect()
}

fn ranked<'a>(counts: impl Iterator<Item = (&'a String, u64)>) -> Vec<(String, String)> {
    let mut counts: Vec<(&String, u64)> = counts.collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .map(|(name, count)| (format!("{name} ({count})"), name.clone()))
        .collect()
}

/// Asks the user to pick one of `choices`. Returns `None` if there is
/// nothing to pick from.
fn pick(
    prompt: &str,
    choices: Vec<(String, String)>,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    if choices.is_empty() {
        println!("Nothing to filter on: the working set is empty.");
        return Ok(None);
    }

    let labels: Vec<&str> = choices.iter().map(|(label, _)| label.as_str()).collect();
    let idx = Select::new()
        .with_prompt(prompt)
        .items(&labels)
        .default(0)
        .max_length(20)
        .interact()?;

    Ok(choices.into_iter().nth(idx).map(|(_, value)| value))
}

fn pick_hour() -> Result<Option<u8>, Box<dyn std::error::Error>> {
    let labels: Vec<String> = (0u8..24).map(|h| format!("{h:02}:00")).collect();
    let idx = Select::new()
        .with_prompt("Hour of day")
        .items(&labels)
        .default(0)
        .max_length(24)
        .interact()?;

    Ok(u8::try_from(idx).ok())
}

fn prompt_inputs() -> Result<InputArgs, Box<dyn std::error::Error>> {
    let records: String = Input::new()
        .with_prompt("Crash records CSV")
        .interact_text()?;
    let boundaries: String = Input::new()
        .with_prompt("Borough boundaries GeoJSON")
        .interact_text()?;
    let config: String = Input::new()
        .with_prompt("Config TOML (empty for defaults)")
        .allow_empty(true)
        .interact_text()?;

    Ok(InputArgs {
        records: PathBuf::from(records.trim()),
        boundaries: PathBuf::from(boundaries.trim()),
        config: Some(config.trim())
            .filter(|c| !c.is_empty())
            .map(PathBuf::from),
    })
}
