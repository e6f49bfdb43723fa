//! The working set of crash records.

use crash_map_crash_models::CrashRecord;
use crash_map_geography::BoroughBoundaries;

/// Owns the current working set and the borough boundaries.
///
/// Seeded once by [`RecordStore::load`]; afterwards only
/// [`RecordStore::replace`] changes the records, always as a whole.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<CrashRecord>,
    boundaries: Option<BoroughBoundaries>,
    total_loaded: usize,
    loaded: bool,
}

impl RecordStore {
    /// Creates an empty, unloaded store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with the full dataset.
    ///
    /// Only the first call takes effect; later calls are ignored and return
    /// `false`. Boundaries may be `None` and attached later with
    /// [`Self::attach_boundaries`].
    pub fn load(
        &mut self,
        records: Vec<CrashRecord>,
        boundaries: Option<BoroughBoundaries>,
    ) -> bool {
        if self.loaded {
            log::warn!("Record store already loaded, ignoring second load");
            return false;
        }

        log::info!("Record store seeded with {} records", records.len());
        self.total_loaded = records.len();
        self.records = records;
        if boundaries.is_some() {
            self.boundaries = boundaries;
        }
        self.loaded = true;
        true
    }

    /// Supplies boundaries that were not available at load time. Replaces
    /// any boundaries already present.
    pub fn attach_boundaries(&mut self, boundaries: BoroughBoundaries) {
        self.boundaries = Some(boundaries);
    }

    /// Replaces the whole working set.
    pub fn replace(&mut self, records: Vec<CrashRecord>) {
        self.records = records;
    }

    /// The current working set.
    #[must_use]
    pub fn current(&self) -> &[CrashRecord] {
        &self.records
    }

    /// Borough boundaries, once available.
    #[must_use]
    pub const fn boundaries(&self) -> Option<&BoroughBoundaries> {
        self.boundaries.as_ref()
    }

    /// Whether [`Self::load`] has run.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Size of the working set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the working set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Size of the dataset as originally loaded.
    #[must_use]
    pub const fn total_loaded(&self) -> usize {
        self.total_loaded
    }
}
