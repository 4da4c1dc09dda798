use anyhow::Result;
use log::debug;
use std::sync::Arc;

use crate::domain::commands::attendance::{
    DayAttendanceQuery, DayAttendanceResult, MarkAttendanceCommand,
};
use crate::domain::prayer_calendar::PrayerCalendar;
use crate::storage::json::{AttendanceRepository, JsonConnection};
use crate::storage::traits::AttendanceStorage;

/// Service for recording and reading raw attendance marks.
#[derive(Clone)]
pub struct AttendanceService {
    attendance_repository: AttendanceRepository,
    calendar: PrayerCalendar,
}

impl AttendanceService {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self {
            attendance_repository: AttendanceRepository::new(connection),
            calendar: PrayerCalendar::new(),
        }
    }

    /// Set one mark. Idempotent upsert; the log's intermediate maps are
    /// created lazily. Marks can be set for any prayer name, applicable
    /// or not; scoring always goes through the calendar, so a stray mark
    /// on a non-applicable prayer is never counted.
    pub fn mark_attendance(&self, command: MarkAttendanceCommand) -> Result<()> {
        debug!(
            "Marking attendance: date={} person={} prayer={} present={}",
            command.date, command.person_id, command.prayer, command.present
        );
        self.attendance_repository.set_mark(
            &command.date,
            &command.person_id,
            &command.prayer,
            command.present,
        )
    }

    /// One date's raw marks plus the prayers applicable that day, for
    /// rendering a marking sheet.
    pub fn day_attendance(&self, query: DayAttendanceQuery) -> Result<DayAttendanceResult> {
        let log = self.attendance_repository.load_log()?;
        let marks = log.day(&query.date).cloned().unwrap_or_default();
        let prayers = self
            .calendar
            .prayers_for(&query.date)
            .into_iter()
            .map(String::from)
            .collect();

        Ok(DayAttendanceResult {
            date: query.date,
            prayers,
            marks,
        })
    }
}
