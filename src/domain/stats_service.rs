//! Derived attendance statistics.
//!
//! Everything here is recomputed on demand from the stored collections;
//! no derived figure is ever persisted. The service methods load state
//! and delegate to pure functions over `(&[Person], &AttendanceLog)`, so
//! every derivation is testable without touching disk.

use anyhow::Result;
use log::debug;
use std::sync::Arc;

use crate::domain::models::attendance::AttendanceLog;
use crate::domain::models::person::Person as DomainPerson;
use crate::domain::prayer_calendar::PrayerCalendar;
use crate::storage::json::{AttendanceRepository, JsonConnection, PersonRepository};
use crate::storage::traits::{AttendanceStorage, PersonStorage};

/// A person only counts as chronically absent once their fully-absent day
/// count exceeds this.
pub const DEFAULT_ABSENCE_THRESHOLD: usize = 3;

/// Present count for one prayer on one date.
#[derive(Debug, Clone, PartialEq)]
pub struct PrayerCount {
    pub prayer: String,
    pub present: usize,
}

/// One point of the per-date participation series: how many people were
/// present at at least one applicable prayer that day.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipationPoint {
    pub date: String,
    pub present_count: usize,
}

/// Per-prayer present counts for one date (grouped chart rows). Only the
/// prayers applicable on that date appear.
#[derive(Debug, Clone, PartialEq)]
pub struct PrayerSeriesRow {
    pub date: String,
    pub counts: Vec<PrayerCount>,
}

/// A person whose fully-absent day count exceeded the threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct ChronicAbsentee {
    pub person: DomainPerson,
    pub absent_count: usize,
    /// The fully-absent dates, ascending.
    pub absent_dates: Vec<String>,
}

/// The dashboard numbers for one date.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub date: String,
    pub total_people: usize,
    pub prayer_counts: Vec<PrayerCount>,
    pub fully_present_count: usize,
    pub always_present_count: usize,
}

/// Service deriving all reporting views from stored state.
#[derive(Clone)]
pub struct StatsService {
    person_repository: PersonRepository,
    attendance_repository: AttendanceRepository,
    calendar: PrayerCalendar,
}

impl StatsService {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self {
            person_repository: PersonRepository::new(connection.clone()),
            attendance_repository: AttendanceRepository::new(connection),
            calendar: PrayerCalendar::new(),
        }
    }

    fn load(&self) -> Result<(Vec<DomainPerson>, AttendanceLog)> {
        let people = self.person_repository.list_people()?;
        let log = self.attendance_repository.load_log()?;
        Ok((people, log))
    }

    /// Per applicable prayer of `date`, how many people were marked
    /// present.
    pub fn daily_counts(&self, date: &str) -> Result<Vec<PrayerCount>> {
        let (people, log) = self.load()?;
        Ok(daily_counts(&people, &log, &self.calendar, date))
    }

    /// People present at every prayer applicable on `date`.
    pub fn fully_present_on(&self, date: &str) -> Result<Vec<DomainPerson>> {
        let (people, log) = self.load()?;
        Ok(fully_present_on(&people, &log, &self.calendar, date))
    }

    /// People present at every applicable prayer on every recorded date.
    /// Empty when the log has no dates at all: with nothing recorded, no
    /// one gets credit for perfect attendance.
    pub fn always_present(&self) -> Result<Vec<DomainPerson>> {
        let (people, log) = self.load()?;
        Ok(always_present(&people, &log, &self.calendar))
    }

    /// Per recorded date ascending, how many people attended at least one
    /// applicable prayer.
    pub fn participation_series(&self) -> Result<Vec<ParticipationPoint>> {
        let (people, log) = self.load()?;
        Ok(participation_series(&people, &log, &self.calendar))
    }

    /// Per recorded date ascending, per applicable prayer, the present
    /// count.
    pub fn prayer_series(&self) -> Result<Vec<PrayerSeriesRow>> {
        let (people, log) = self.load()?;
        Ok(prayer_series(&people, &log, &self.calendar))
    }

    /// People whose count of fully-absent recorded days exceeds
    /// `threshold`. A day is fully absent when the person attended zero
    /// applicable prayers; never marked and explicitly marked absent are
    /// the same thing, so people added after dates were recorded count as
    /// absent on all of those dates.
    pub fn chronic_absentees(&self, threshold: usize) -> Result<Vec<ChronicAbsentee>> {
        let (people, log) = self.load()?;
        debug!(
            "Computing chronic absentees over {} people and {} dates (threshold {})",
            people.len(),
            log.date_count(),
            threshold
        );
        Ok(chronic_absentees(&people, &log, &self.calendar, threshold))
    }

    /// The dashboard numbers for `date` in one pass.
    pub fn dashboard(&self, date: &str) -> Result<DashboardSummary> {
        let (people, log) = self.load()?;
        Ok(DashboardSummary {
            date: date.to_string(),
            total_people: people.len(),
            prayer_counts: daily_counts(&people, &log, &self.calendar, date),
            fully_present_count: fully_present_on(&people, &log, &self.calendar, date).len(),
            always_present_count: always_present(&people, &log, &self.calendar).len(),
        })
    }
}

fn daily_counts(
    people: &[DomainPerson],
    log: &AttendanceLog,
    calendar: &PrayerCalendar,
    date: &str,
) -> Vec<PrayerCount> {
    calendar
        .prayers_for(date)
        .into_iter()
        .map(|prayer| PrayerCount {
            prayer: prayer.to_string(),
            present: people
                .iter()
                .filter(|p| log.is_present(date, &p.id, prayer))
                .count(),
        })
        .collect()
}

fn fully_present_on(
    people: &[DomainPerson],
    log: &AttendanceLog,
    calendar: &PrayerCalendar,
    date: &str,
) -> Vec<DomainPerson> {
    let prayers = calendar.prayers_for(date);
    people
        .iter()
        .filter(|p| prayers.iter().all(|prayer| log.is_present(date, &p.id, prayer)))
        .cloned()
        .collect()
}

fn always_present(
    people: &[DomainPerson],
    log: &AttendanceLog,
    calendar: &PrayerCalendar,
) -> Vec<DomainPerson> {
    if log.is_empty() {
        return Vec::new();
    }
    people
        .iter()
        .filter(|p| {
            log.dates().all(|date| {
                calendar
                    .prayers_for(date)
                    .iter()
                    .all(|prayer| log.is_present(date, &p.id, prayer))
            })
        })
        .cloned()
        .collect()
}

fn participation_series(
    people: &[DomainPerson],
    log: &AttendanceLog,
    calendar: &PrayerCalendar,
) -> Vec<ParticipationPoint> {
    log.dates()
        .map(|date| {
            let prayers = calendar.prayers_for(date);
            let present_count = people
                .iter()
                .filter(|p| prayers.iter().any(|prayer| log.is_present(date, &p.id, prayer)))
                .count();
            ParticipationPoint {
                date: date.to_string(),
                present_count,
            }
        })
        .collect()
}

fn prayer_series(
    people: &[DomainPerson],
    log: &AttendanceLog,
    calendar: &PrayerCalendar,
) -> Vec<PrayerSeriesRow> {
    log.dates()
        .map(|date| PrayerSeriesRow {
            date: date.to_string(),
            counts: daily_counts(people, log, calendar, date),
        })
        .collect()
}

fn chronic_absentees(
    people: &[DomainPerson],
    log: &AttendanceLog,
    calendar: &PrayerCalendar,
    threshold: usize,
) -> Vec<ChronicAbsentee> {
    people
        .iter()
        .filter_map(|person| {
            let absent_dates: Vec<String> = log
                .dates()
                .filter(|date| {
                    !calendar
                        .prayers_for(date)
                        .iter()
                        .any(|prayer| log.is_present(date, &person.id, prayer))
                })
                .map(String::from)
                .collect();

            (absent_dates.len() > threshold).then(|| ChronicAbsentee {
                person: person.clone(),
                absent_count: absent_dates.len(),
                absent_dates,
            })
        })
        .collect()
}
