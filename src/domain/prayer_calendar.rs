//! Prayer calendar for the attendance tracker.
//!
//! Decides which prayers apply to a given date: the five daily prayers on
//! every day, with Jumuah appended on Fridays. The applicable list is
//! computed, never stored, so a person is never penalized for missing a
//! prayer that did not take place that day.

use chrono::{Datelike, Local, NaiveDate, Weekday};

/// The five daily prayers, in the order they are marked and reported.
pub const DAILY_PRAYERS: [&str; 5] = ["Fajr", "Zuhr", "Asr", "Maghrib", "Isha"];

/// The additional Friday congregational prayer.
pub const JUMUAH: &str = "Jumuah";

/// Every prayer name the exchange format recognizes.
pub const ALL_PRAYERS: [&str; 6] = ["Fajr", "Zuhr", "Asr", "Maghrib", "Isha", "Jumuah"];

#[derive(Debug, Clone, Default)]
pub struct PrayerCalendar;

impl PrayerCalendar {
    pub fn new() -> Self {
        Self
    }

    /// Today's date as the ISO `YYYY-MM-DD` key used throughout the log.
    pub fn today(&self) -> String {
        Local::now().date_naive().format("%Y-%m-%d").to_string()
    }

    /// Whether the date falls on a Friday. A date that does not parse as
    /// ISO `YYYY-MM-DD` is treated as an ordinary day.
    pub fn is_friday(&self, date: &str) -> bool {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map(|d| d.weekday() == Weekday::Fri)
            .unwrap_or(false)
    }

    /// The ordered list of prayers applicable on `date`.
    pub fn prayers_for(&self, date: &str) -> Vec<&'static str> {
        let mut prayers: Vec<&'static str> = DAILY_PRAYERS.to_vec();
        if self.is_friday(date) {
            prayers.push(JUMUAH);
        }
        prayers
    }
}
