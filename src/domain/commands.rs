//! Domain-level command and query types.
//!
//! These structs are used by services inside the domain layer. A hosting
//! UI maps its form inputs and view models to these internal types; the
//! services never see UI concerns.

pub mod people {
    use crate::domain::models::person::Person as DomainPerson;

    /// Input for adding a new person.
    #[derive(Debug, Clone)]
    pub struct CreatePersonCommand {
        pub name: String,
        pub mobile: String,
        pub address: String,
    }

    /// Result of adding a new person.
    #[derive(Debug, Clone)]
    pub struct CreatePersonResult {
        pub person: DomainPerson,
    }

    /// Input for editing a person. `None` fields are left unchanged.
    #[derive(Debug, Clone, Default)]
    pub struct UpdatePersonCommand {
        pub person_id: String,
        pub name: Option<String>,
        pub mobile: Option<String>,
        pub address: Option<String>,
    }

    /// Result of editing a person.
    #[derive(Debug, Clone)]
    pub struct UpdatePersonResult {
        pub person: DomainPerson,
    }

    /// Input for looking up one person.
    #[derive(Debug, Clone)]
    pub struct GetPersonCommand {
        pub person_id: String,
    }

    /// Result of looking up one person.
    #[derive(Debug, Clone)]
    pub struct GetPersonResult {
        pub person: Option<DomainPerson>,
    }

    /// Result of listing all people, in stored (insertion) order.
    #[derive(Debug, Clone)]
    pub struct ListPeopleResult {
        pub people: Vec<DomainPerson>,
    }

    /// Input for deleting a person.
    #[derive(Debug, Clone)]
    pub struct DeletePersonCommand {
        pub person_id: String,
    }

    /// Result of deleting a person.
    #[derive(Debug, Clone)]
    pub struct DeletePersonResult {
        pub success_message: String,
    }
}

pub mod attendance {
    use crate::domain::models::attendance::DayMarks;

    /// Input for setting one attendance mark.
    #[derive(Debug, Clone)]
    pub struct MarkAttendanceCommand {
        pub date: String,
        pub person_id: String,
        pub prayer: String,
        pub present: bool,
    }

    /// Query for one date's raw marks.
    #[derive(Debug, Clone)]
    pub struct DayAttendanceQuery {
        pub date: String,
    }

    /// One date's raw marks plus the prayers applicable that day.
    #[derive(Debug, Clone)]
    pub struct DayAttendanceResult {
        pub date: String,
        pub prayers: Vec<String>,
        pub marks: DayMarks,
    }
}

pub mod exchange {
    /// Result of serializing the full state to CSV.
    #[derive(Debug, Clone)]
    pub struct ExportAttendanceResult {
        pub csv_content: String,
        pub filename: String,
        pub row_count: usize,
    }

    /// Input for exporting directly to a directory on disk.
    #[derive(Debug, Clone, Default)]
    pub struct ExportToPathCommand {
        /// Target directory; falls back to the user's documents directory.
        pub custom_path: Option<String>,
    }

    /// Outcome of an export-to-path attempt. IO failures are reported here
    /// rather than as errors.
    #[derive(Debug, Clone)]
    pub struct ExportToPathResult {
        pub success: bool,
        pub message: String,
        pub file_path: String,
        pub row_count: usize,
    }

    /// Input for restoring state from an uploaded CSV document.
    #[derive(Debug, Clone)]
    pub struct ImportAttendanceCommand {
        pub csv_content: String,
    }

    /// Result of a completed import.
    #[derive(Debug, Clone)]
    pub struct ImportAttendanceResult {
        pub people_count: usize,
        pub date_count: usize,
        pub success_message: String,
    }
}
