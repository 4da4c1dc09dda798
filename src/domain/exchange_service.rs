//! Tabular exchange of the full tracker state.
//!
//! Export writes one CSV row per (recorded date, person) pair; import
//! rebuilds both stored collections from such a document, replacing
//! whatever was there. The round trip is intentionally lossy: person ids
//! do not survive, identity is re-keyed from the mobile number.

use anyhow::Result;
use log::{error, info, warn};
use std::fs;
use std::sync::Arc;

use crate::domain::commands::exchange::{
    ExportAttendanceResult, ExportToPathCommand, ExportToPathResult, ImportAttendanceCommand,
    ImportAttendanceResult,
};
use crate::domain::models::attendance::AttendanceLog;
use crate::domain::models::person::Person as DomainPerson;
use crate::domain::prayer_calendar::{PrayerCalendar, ALL_PRAYERS, DAILY_PRAYERS, JUMUAH};
use crate::storage::json::{AttendanceRepository, JsonConnection, PersonRepository};
use crate::storage::traits::{AttendanceStorage, PersonStorage};

/// The fixed export header. Prayer cells hold `Present`/`Absent`; the
/// Jumuah cell stays empty on non-Fridays since the prayer was not
/// applicable that day.
pub const EXPORT_HEADER: [&str; 11] = [
    "Date",
    "Name",
    "Mobile",
    "Address",
    "Fajr",
    "Zuhr",
    "Asr",
    "Maghrib",
    "Isha",
    "Jumuah",
    "Total Absent Namaz",
];

const PRESENT_LABEL: &str = "Present";
const ABSENT_LABEL: &str = "Absent";

/// Service serializing state to and restoring state from tabular rows.
#[derive(Clone)]
pub struct ExchangeService {
    person_repository: PersonRepository,
    attendance_repository: AttendanceRepository,
    calendar: PrayerCalendar,
}

impl ExchangeService {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self {
            person_repository: PersonRepository::new(connection.clone()),
            attendance_repository: AttendanceRepository::new(connection),
            calendar: PrayerCalendar::new(),
        }
    }

    /// Serialize the full state: one row per recorded date (ascending) per
    /// person (stored order).
    pub fn export_csv(&self) -> Result<ExportAttendanceResult> {
        info!("📄 EXPORT: Serializing attendance to CSV");

        let people = self.person_repository.list_people()?;
        let log = self.attendance_repository.load_log()?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(EXPORT_HEADER)?;

        let mut row_count = 0usize;
        for date in log.dates() {
            let friday = self.calendar.is_friday(date);
            for person in &people {
                writer.write_record(export_row(&log, date, person, friday))?;
                row_count += 1;
            }
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush CSV writer: {}", e))?;
        let csv_content = String::from_utf8(bytes)?;
        let filename = format!("attendance-{}.csv", self.calendar.today());

        info!(
            "✅ EXPORT: Serialized {} rows ({} bytes) as {}",
            row_count,
            csv_content.len(),
            filename
        );

        Ok(ExportAttendanceResult {
            csv_content,
            filename,
            row_count,
        })
    }

    /// Export directly to a directory: the sanitized custom path if one is
    /// given, otherwise the user's documents directory (home as fallback).
    /// IO failures are reported in the result, not returned as errors.
    pub fn export_to_path(&self, command: ExportToPathCommand) -> Result<ExportToPathResult> {
        info!(
            "📁 EXPORT: Exporting to path - custom_path: {:?}",
            command.custom_path
        );

        let export = self.export_csv()?;

        let export_dir = match command.custom_path {
            Some(ref custom_path) if !custom_path.trim().is_empty() => {
                std::path::PathBuf::from(sanitize_path(custom_path))
            }
            _ => match dirs::document_dir().or_else(dirs::home_dir) {
                Some(dir) => dir,
                None => {
                    error!("❌ EXPORT: Could not determine default export directory");
                    return Ok(ExportToPathResult {
                        success: false,
                        message: "Failed to determine export directory".to_string(),
                        file_path: String::new(),
                        row_count: 0,
                    });
                }
            },
        };

        let file_path = export_dir.join(&export.filename);

        if let Some(parent_dir) = file_path.parent() {
            if let Err(e) = fs::create_dir_all(parent_dir) {
                error!(
                    "❌ EXPORT: Failed to create export directory {}: {}",
                    parent_dir.display(),
                    e
                );
                return Ok(ExportToPathResult {
                    success: false,
                    message: format!("Failed to create export directory: {}", e),
                    file_path: parent_dir.display().to_string(),
                    row_count: 0,
                });
            }
        }

        match fs::write(&file_path, &export.csv_content) {
            Ok(_) => {
                let file_path_str = file_path.display().to_string();
                info!(
                    "✅ EXPORT: Exported {} rows to: {}",
                    export.row_count, file_path_str
                );
                Ok(ExportToPathResult {
                    success: true,
                    message: format!("File exported successfully to: {}", file_path_str),
                    file_path: file_path_str,
                    row_count: export.row_count,
                })
            }
            Err(e) => {
                error!(
                    "❌ EXPORT: Failed to write export file to {}: {}",
                    file_path.display(),
                    e
                );
                Ok(ExportToPathResult {
                    success: false,
                    message: format!("Failed to write export file: {}", e),
                    file_path: file_path.display().to_string(),
                    row_count: 0,
                })
            }
        }
    }

    /// Restore state from an uploaded CSV document, replacing both stored
    /// collections. Rows are grouped into people by mobile number (first
    /// row wins for name and address); reconstructed ids are
    /// `<mobile>_<name>`, so the round trip keeps identity by name+mobile
    /// but not by id. Only the six known prayer columns are read; other
    /// columns and empty cells are ignored. Malformed rows contribute
    /// best-effort partial records; the import is never rejected.
    pub fn import_csv(&self, command: ImportAttendanceCommand) -> Result<ImportAttendanceResult> {
        info!("📄 IMPORT: Restoring attendance from CSV");

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(command.csv_content.as_bytes());
        let headers = reader.headers()?.clone();

        let column = |name: &str| headers.iter().position(|h| h == name);
        let date_column = column("Date");
        let name_column = column("Name");
        let mobile_column = column("Mobile");
        let address_column = column("Address");
        let prayer_columns: Vec<(&'static str, Option<usize>)> =
            ALL_PRAYERS.iter().map(|p| (*p, column(p))).collect();

        let mut people: Vec<DomainPerson> = Vec::new();
        let mut log = AttendanceLog::new();

        for result in reader.records() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    warn!("Skipping unreadable row: {}", e);
                    continue;
                }
            };
            let field = |column: Option<usize>| {
                column
                    .and_then(|i| record.get(i))
                    .unwrap_or("")
                    .trim()
                    .to_string()
            };

            let mobile = field(mobile_column);
            let person_id = match people.iter().find(|p| p.mobile == mobile) {
                Some(person) => person.id.clone(),
                None => {
                    let name = field(name_column);
                    let person = DomainPerson {
                        id: format!("{}_{}", mobile, name),
                        name,
                        mobile: mobile.clone(),
                        address: field(address_column),
                    };
                    let id = person.id.clone();
                    people.push(person);
                    id
                }
            };

            let date = field(date_column);
            log.ensure_entry(&date, &person_id);
            for (prayer, column) in &prayer_columns {
                if let Some(value) = column.and_then(|i| record.get(i)) {
                    let value = value.trim();
                    if value.is_empty() {
                        // Not applicable that date; no mark to restore.
                        continue;
                    }
                    log.set_mark(&date, &person_id, prayer, value == PRESENT_LABEL);
                }
            }
        }

        self.person_repository.replace_all_people(&people)?;
        self.attendance_repository.replace_log(&log)?;

        let result = ImportAttendanceResult {
            people_count: people.len(),
            date_count: log.date_count(),
            success_message: format!(
                "Imported {} people across {} dates",
                people.len(),
                log.date_count()
            ),
        };
        info!("✅ IMPORT: {}", result.success_message);
        Ok(result)
    }
}

fn export_row(
    log: &AttendanceLog,
    date: &str,
    person: &DomainPerson,
    friday: bool,
) -> Vec<String> {
    let mut record = vec![
        date.to_string(),
        person.name.clone(),
        person.mobile.clone(),
        person.address.clone(),
    ];

    let mut absent = 0usize;
    let mut label = |present: bool| {
        if present {
            PRESENT_LABEL.to_string()
        } else {
            absent += 1;
            ABSENT_LABEL.to_string()
        }
    };

    for prayer in DAILY_PRAYERS {
        let cell = label(log.is_present(date, &person.id, prayer));
        record.push(cell);
    }
    if friday {
        let cell = label(log.is_present(date, &person.id, JUMUAH));
        record.push(cell);
    } else {
        record.push(String::new());
    }

    record.push(absent.to_string());
    record
}

/// Basic path sanitization to handle common user input issues.
fn sanitize_path(path: &str) -> String {
    let mut cleaned = path.trim().to_string();

    // Remove surrounding quotes (single or double)
    if (cleaned.starts_with('"') && cleaned.ends_with('"') && cleaned.len() >= 2)
        || (cleaned.starts_with('\'') && cleaned.ends_with('\'') && cleaned.len() >= 2)
    {
        cleaned = cleaned[1..cleaned.len() - 1].to_string();
    }

    cleaned = cleaned.trim().to_string();

    // Handle escaped spaces
    cleaned = cleaned.replace("\\ ", " ");

    while cleaned.ends_with('/') || cleaned.ends_with('\\') {
        cleaned.pop();
    }

    // Tilde expansion for the home directory
    if cleaned.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            if cleaned == "~" {
                cleaned = home.display().to_string();
            } else if cleaned.starts_with("~/") || cleaned.starts_with("~\\") {
                cleaned = home.join(&cleaned[2..]).display().to_string();
            }
        }
    }

    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::json::test_utils::TestEnvironment;

    const FRIDAY: &str = "2024-01-05";
    const THURSDAY: &str = "2024-01-04";

    fn setup_service() -> (ExchangeService, PersonRepository, AttendanceRepository, TestEnvironment)
    {
        let env = TestEnvironment::new().unwrap();
        let service = ExchangeService::new(env.connection.clone());
        let person_repository = PersonRepository::new(env.connection.clone());
        let attendance_repository = AttendanceRepository::new(env.connection.clone());
        (service, person_repository, attendance_repository, env)
    }

    fn alice() -> DomainPerson {
        DomainPerson {
            id: "person::1".to_string(),
            name: "Alice".to_string(),
            mobile: "5551234567".to_string(),
            address: "Main St".to_string(),
        }
    }

    fn parse_rows(csv_content: &str) -> (Vec<String>, Vec<Vec<String>>) {
        let mut reader = csv::Reader::from_reader(csv_content.as_bytes());
        let headers = reader
            .headers()
            .unwrap()
            .iter()
            .map(String::from)
            .collect();
        let rows = reader
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect();
        (headers, rows)
    }

    #[test]
    fn export_emits_fixed_header_and_per_date_rows() {
        let (service, person_repository, attendance_repository, _env) = setup_service();
        person_repository.store_person(&alice()).unwrap();
        attendance_repository
            .set_mark(THURSDAY, "person::1", "Fajr", true)
            .unwrap();
        attendance_repository
            .set_mark(FRIDAY, "person::1", "Jumuah", true)
            .unwrap();

        let export = service.export_csv().unwrap();
        assert_eq!(export.row_count, 2);
        assert!(export.filename.starts_with("attendance-"));
        assert!(export.filename.ends_with(".csv"));

        let (headers, rows) = parse_rows(&export.csv_content);
        assert_eq!(headers, EXPORT_HEADER.to_vec());

        // Thursday row: Fajr present, four daily prayers absent, Jumuah
        // cell empty (not applicable), 4 missed.
        let thursday = &rows[0];
        assert_eq!(thursday[0], THURSDAY);
        assert_eq!(thursday[1], "Alice");
        assert_eq!(thursday[4], "Present");
        assert_eq!(thursday[5], "Absent");
        assert_eq!(thursday[9], "");
        assert_eq!(thursday[10], "4");

        // Friday row: only Jumuah present, all five daily prayers missed.
        let friday = &rows[1];
        assert_eq!(friday[0], FRIDAY);
        assert_eq!(friday[9], "Present");
        assert_eq!(friday[10], "5");
    }

    #[test]
    fn import_restores_every_applicable_mark_of_an_export() {
        let (service, person_repository, attendance_repository, _env) = setup_service();
        person_repository.store_person(&alice()).unwrap();
        for prayer in DAILY_PRAYERS {
            attendance_repository
                .set_mark(THURSDAY, "person::1", prayer, true)
                .unwrap();
        }
        attendance_repository
            .set_mark(FRIDAY, "person::1", "Fajr", true)
            .unwrap();
        attendance_repository
            .set_mark(FRIDAY, "person::1", "Jumuah", false)
            .unwrap();
        let original_log = attendance_repository.load_log().unwrap();

        let export = service.export_csv().unwrap();
        let result = service
            .import_csv(ImportAttendanceCommand {
                csv_content: export.csv_content,
            })
            .unwrap();
        assert_eq!(result.people_count, 1);
        assert_eq!(result.date_count, 2);

        let people = person_repository.list_people().unwrap();
        assert_eq!(people[0].name, "Alice");
        assert_eq!(people[0].mobile, "5551234567");
        assert_eq!(people[0].id, "5551234567_Alice");

        let restored_log = attendance_repository.load_log().unwrap();
        let calendar = PrayerCalendar::new();
        for date in [THURSDAY, FRIDAY] {
            for prayer in calendar.prayers_for(date) {
                assert_eq!(
                    restored_log.is_present(date, &people[0].id, prayer),
                    original_log.is_present(date, "person::1", prayer),
                    "mismatch at {} {}",
                    date,
                    prayer
                );
            }
        }
    }

    #[test]
    fn import_replaces_existing_state() {
        let (service, person_repository, attendance_repository, _env) = setup_service();
        person_repository.store_person(&alice()).unwrap();
        attendance_repository
            .set_mark(THURSDAY, "person::1", "Fajr", true)
            .unwrap();

        let csv_content = "Date,Name,Mobile,Address,Fajr,Zuhr,Asr,Maghrib,Isha,Jumuah,Total Absent Namaz\n\
                           2024-02-01,Bob,5550001111,,Present,Absent,Absent,Absent,Absent,,4\n";
        service
            .import_csv(ImportAttendanceCommand {
                csv_content: csv_content.to_string(),
            })
            .unwrap();

        let people = person_repository.list_people().unwrap();
        assert_eq!(people.len(), 1);
        assert_eq!(people[0].name, "Bob");

        let log = attendance_repository.load_log().unwrap();
        assert_eq!(log.date_count(), 1);
        assert!(log.is_present("2024-02-01", &people[0].id, "Fajr"));
        assert!(log.day(THURSDAY).is_none());
    }

    #[test]
    fn import_groups_rows_by_mobile_and_ignores_unknown_columns() {
        let (service, person_repository, _attendance_repository, _env) = setup_service();

        let csv_content = "Date,Name,Mobile,Address,Fajr,Isha,Sehri,Total Absent Namaz\n\
                           2024-01-04,Alice,5551234567,Main St,Present,Absent,Present,4\n\
                           2024-01-06,Alice,5551234567,Elsewhere,Absent,Present,,4\n";
        let result = service
            .import_csv(ImportAttendanceCommand {
                csv_content: csv_content.to_string(),
            })
            .unwrap();

        assert_eq!(result.people_count, 1);
        assert_eq!(result.date_count, 2);

        // First row wins for the address; the unknown "Sehri" column left
        // no mark behind.
        let people = person_repository.list_people().unwrap();
        assert_eq!(people[0].address, "Main St");

        let log = service.attendance_repository.load_log().unwrap();
        let marks = log.day("2024-01-04").unwrap().get(&people[0].id).unwrap();
        assert_eq!(marks.len(), 2);
        assert!(marks["Fajr"]);
        assert!(!marks["Isha"]);
    }

    #[test]
    fn import_keeps_malformed_rows_best_effort() {
        let (service, person_repository, _attendance_repository, _env) = setup_service();

        // Second row is missing most cells; it still lands as a partial
        // record rather than rejecting the import.
        let csv_content = "Date,Name,Mobile,Address,Fajr,Zuhr,Asr,Maghrib,Isha,Jumuah,Total Absent Namaz\n\
                           2024-01-04,Alice,5551234567,,Present,Absent,Absent,Absent,Absent,,4\n\
                           2024-01-05,Bob\n";
        let result = service
            .import_csv(ImportAttendanceCommand {
                csv_content: csv_content.to_string(),
            })
            .unwrap();

        assert_eq!(result.people_count, 2);
        let people = person_repository.list_people().unwrap();
        assert_eq!(people[1].name, "Bob");
        assert_eq!(people[1].mobile, "");
    }

    #[test]
    fn sanitize_path_handles_quotes_spaces_and_trailing_slashes() {
        assert_eq!(sanitize_path("  /path/to/dir  "), "/path/to/dir");
        assert_eq!(sanitize_path("\"/path/to/dir\""), "/path/to/dir");
        assert_eq!(sanitize_path("/path\\ to\\ dir"), "/path to dir");
        assert_eq!(sanitize_path("/path/to/dir/"), "/path/to/dir");
    }

    #[test]
    fn export_to_path_writes_the_file() {
        let (service, person_repository, attendance_repository, env) = setup_service();
        person_repository.store_person(&alice()).unwrap();
        attendance_repository
            .set_mark(THURSDAY, "person::1", "Fajr", true)
            .unwrap();

        let target = env.base_path.join("exports");
        let result = service
            .export_to_path(ExportToPathCommand {
                custom_path: Some(target.display().to_string()),
            })
            .unwrap();

        assert!(result.success, "{}", result.message);
        assert_eq!(result.row_count, 1);
        let written = fs::read_to_string(&result.file_path).unwrap();
        assert!(written.starts_with("Date,Name,Mobile,Address"));
    }
}
