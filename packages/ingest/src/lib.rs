#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loads the crash dataset and borough boundaries.
//!
//! The crash CSV is read once into [`CrashRecord`]s. Individual fields that
//! fail to parse are dropped from their record (see [`parsing`]) while the
//! rest of the file keeps loading; only I/O errors and malformed CSV abort
//! the load. [`load_inputs`] reads the CSV and the boundary `GeoJSON`
//! concurrently.

pub mod parsing;

use std::io::Read;
use std::path::{Path, PathBuf};

use crash_map_crash_models::{CrashRecord, InjuryCategory, InjuryCounts};
use crash_map_geography::{BoroughBoundaries, GeographyError};
use csv::StringRecord;

use crate::parsing::{non_empty, parse_count, parse_crash_hour, parse_lon_lat};

/// Column holding the borough name.
pub const BOROUGH_COLUMN: &str = "BOROUGH";
/// Column holding the wall-clock crash time.
pub const CRASH_TIME_COLUMN: &str = "CRASH TIME";
/// Column holding the first contributing factor.
pub const FACTOR_1_COLUMN: &str = "CONTRIBUTING FACTOR VEHICLE 1";
/// Column holding the second contributing factor.
pub const FACTOR_2_COLUMN: &str = "CONTRIBUTING FACTOR VEHICLE 2";
/// Column holding the first vehicle type.
pub const VEHICLE_1_COLUMN: &str = "VEHICLE TYPE CODE 1";
/// Column holding the second vehicle type.
pub const VEHICLE_2_COLUMN: &str = "VEHICLE TYPE CODE 2";
/// Column holding the longitude.
pub const LONGITUDE_COLUMN: &str = "LONGITUDE";
/// Column holding the latitude.
pub const LATITUDE_COLUMN: &str = "LATITUDE";

/// Errors that can occur while loading input resources.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The crash file is not valid CSV.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The boundary file could not be loaded.
    #[error("Boundary error: {0}")]
    Geography(#[from] GeographyError),

    /// A blocking load task panicked or was cancelled.
    #[error("Load task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Positions of the known columns in the CSV header. Columns absent from the
/// file are `None` and their fields are treated as missing on every row.
#[derive(Debug, Default)]
struct ColumnIndex {
    borough: Option<usize>,
    crash_time: Option<usize>,
    factor_1: Option<usize>,
    factor_2: Option<usize>,
    vehicle_1: Option<usize>,
    vehicle_2: Option<usize>,
    longitude: Option<usize>,
    latitude: Option<usize>,
    injuries: Vec<(InjuryCategory, usize)>,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Self {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);

        let index = Self {
            borough: find(BOROUGH_COLUMN),
            crash_time: find(CRASH_TIME_COLUMN),
            factor_1: find(FACTOR_1_COLUMN),
            factor_2: find(FACTOR_2_COLUMN),
            vehicle_1: find(VEHICLE_1_COLUMN),
            vehicle_2: find(VEHICLE_2_COLUMN),
            longitude: find(LONGITUDE_COLUMN),
            latitude: find(LATITUDE_COLUMN),
            injuries: InjuryCategory::all()
                .iter()
                .filter_map(|c| find(c.column()).map(|i| (*c, i)))
                .collect(),
        };

        for (name, position) in [
            (BOROUGH_COLUMN, index.borough),
            (CRASH_TIME_COLUMN, index.crash_time),
            (FACTOR_1_COLUMN, index.factor_1),
            (FACTOR_2_COLUMN, index.factor_2),
            (VEHICLE_1_COLUMN, index.vehicle_1),
            (VEHICLE_2_COLUMN, index.vehicle_2),
        ] {
            if position.is_none() {
                log::warn!("Crash data has no '{name}' column");
            }
        }

        index
    }

    fn text(row: &StringRecord, position: Option<usize>) -> Option<String> {
        position.and_then(|i| row.get(i)).and_then(non_empty)
    }

    fn record(&self, row: &StringRecord, line: u64) -> CrashRecord {
        let crash_hour = self
            .crash_time
            .and_then(|i| row.get(i))
            .and_then(|raw| {
                let hour = parse_crash_hour(raw);
                if hour.is_none() && !raw.trim().is_empty() {
                    log::debug!("Line {line}: unparseable crash time '{raw}'");
                }
                hour
            });

        let mut injuries = InjuryCounts::new();
        for (category, i) in &self.injuries {
            let Some(raw) = row.get(*i) else {
                continue;
            };
            match parse_count(raw) {
                Some(value) => injuries.set(*category, value),
                None => log::debug!("Line {line}: unparseable {category} value '{raw}'"),
            }
        }

        let coordinates = parse_lon_lat(
            self.longitude.and_then(|i| row.get(i)),
            self.latitude.and_then(|i| row.get(i)),
        );

        CrashRecord {
            borough: Self::text(row, self.borough),
            crash_hour,
            contributing_factor_1: Self::text(row, self.factor_1),
            contributing_factor_2: Self::text(row, self.factor_2),
            vehicle_type_1: Self::text(row, self.vehicle_1),
            vehicle_type_2: Self::text(row, self.vehicle_2),
            injuries,
            longitude: coordinates.map(|(lon, _)| lon),
            latitude: coordinates.map(|(_, lat)| lat),
        }
    }
}

/// Reads crash records from CSV data with a header row.
///
/// # Errors
///
/// Returns [`IngestError`] if the data cannot be read or is not valid CSV.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<CrashRecord>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let columns = ColumnIndex::from_headers(reader.headers()?);
    let mut records = Vec::new();

    for result in reader.records() {
        let row = result?;
        let line = row.position().map_or(0, csv::Position::line);
        records.push(columns.record(&row, line));
    }

    log::info!("Read {} crash records", records.len());

    Ok(records)
}

/// Reads crash records from a CSV file.
///
/// # Errors
///
/// Returns [`IngestError`] if the file cannot be opened or is not valid CSV.
pub fn load_records(path: &Path) -> Result<Vec<CrashRecord>, IngestError> {
    log::info!("Loading crash records from {}", path.display());
    let file = std::fs::File::open(path)?;
    read_records(std::io::BufReader::new(file))
}

/// Both input resources, fully loaded.
#[derive(Debug)]
pub struct LoadedInputs {
    /// Every crash record in the dataset.
    pub records: Vec<CrashRecord>,
    /// Borough outlines for the choropleth.
    pub boundaries: BoroughBoundaries,
}

/// Loads the crash CSV and boundary `GeoJSON` concurrently.
///
/// Parsing runs on blocking threads; both loads must succeed.
///
/// # Errors
///
/// Returns [`IngestError`] if either resource is missing or malformed.
pub async fn load_inputs(
    records_path: &Path,
    boundaries_path: &Path,
) -> Result<LoadedInputs, IngestError> {
    let records_path: PathBuf = records_path.to_path_buf();
    let boundaries_path: PathBuf = boundaries_path.to_path_buf();

    let records = async move {
        tokio::task::spawn_blocking(move || load_records(&records_path)).await?
    };

    let boundaries = async move {
        log::info!("Loading borough boundaries from {}", boundaries_path.display());
        let contents = tokio::fs::read_to_string(&boundaries_path).await?;
        let parsed = tokio::task::spawn_blocking(move || BoroughBoundaries::parse(&contents)).await?;
        Ok::<_, IngestError>(parsed?)
    };

    let (records, boundaries) = tokio::try_join!(records, boundaries)?;

    Ok(LoadedInputs {
        records,
        boundaries,
    })
}
