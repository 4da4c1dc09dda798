use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Marks recorded for one person on one date: prayer name -> present flag.
pub type PrayerMarks = HashMap<String, bool>;

/// Everything recorded for one date: person id -> that person's marks.
pub type DayMarks = HashMap<String, PrayerMarks>;

/// The full attendance record, keyed by ISO `YYYY-MM-DD` date strings.
///
/// The structure is sparse by design: a missing entry at any level means
/// "not marked", which every derived view treats as absent. Entries are
/// created lazily the first time a mark is set and are only removed when a
/// person is deleted. Because date keys are zero-padded ISO strings, the
/// BTreeMap's lexicographic key order is chronological order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttendanceLog(pub BTreeMap<String, DayMarks>);

impl AttendanceLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded dates in ascending order.
    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|date| date.as_str())
    }

    pub fn date_count(&self) -> usize {
        self.0.len()
    }

    /// True when no date has any record at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn day(&self, date: &str) -> Option<&DayMarks> {
        self.0.get(date)
    }

    /// Whether `person_id` was marked present for `prayer` on `date`.
    /// Unmarked is absent.
    pub fn is_present(&self, date: &str, person_id: &str, prayer: &str) -> bool {
        self.0
            .get(date)
            .and_then(|day| day.get(person_id))
            .and_then(|marks| marks.get(prayer))
            .copied()
            .unwrap_or(false)
    }

    /// Idempotent upsert of one mark, creating intermediate maps as needed.
    pub fn set_mark(&mut self, date: &str, person_id: &str, prayer: &str, present: bool) {
        self.0
            .entry(date.to_string())
            .or_default()
            .entry(person_id.to_string())
            .or_default()
            .insert(prayer.to_string(), present);
    }

    /// Create the (date, person) entry without recording any mark. The
    /// import path uses this so a row with no recognizable prayer cells
    /// still registers its date.
    pub fn ensure_entry(&mut self, date: &str, person_id: &str) {
        self.0
            .entry(date.to_string())
            .or_default()
            .entry(person_id.to_string())
            .or_default();
    }

    /// Strip `person_id` from every date's sub-map (cascading delete).
    pub fn remove_person(&mut self, person_id: &str) {
        for day in self.0.values_mut() {
            day.remove(person_id);
        }
    }
}
