//! # Storage Traits
//!
//! Storage abstraction for the two persisted collections. The domain layer
//! works exclusively against these traits, so alternative backends can be
//! substituted without touching any business logic.
//!
//! All operations are synchronous: the tracker is a single-user desktop
//! tool and every mutation is durable before the call returns.

use anyhow::Result;

use crate::domain::models::attendance::AttendanceLog;
use crate::domain::models::person::Person as DomainPerson;

/// Interface for person storage operations.
pub trait PersonStorage: Send + Sync {
    /// Append a new person to the stored collection.
    fn store_person(&self, person: &DomainPerson) -> Result<()>;

    /// Retrieve a specific person by id.
    fn get_person(&self, person_id: &str) -> Result<Option<DomainPerson>>;

    /// Retrieve a specific person by mobile number.
    fn find_person_by_mobile(&self, mobile: &str) -> Result<Option<DomainPerson>>;

    /// List all people in stored (insertion) order.
    fn list_people(&self) -> Result<Vec<DomainPerson>>;

    /// Replace an existing person's record in place.
    fn update_person(&self, person: &DomainPerson) -> Result<()>;

    /// Delete a person by id.
    /// Returns true if the person was found and deleted, false otherwise.
    fn delete_person(&self, person_id: &str) -> Result<bool>;

    /// Replace the whole stored collection (import path).
    fn replace_all_people(&self, people: &[DomainPerson]) -> Result<()>;
}

/// Interface for attendance log storage operations.
pub trait AttendanceStorage: Send + Sync {
    /// Load the full log. Missing or unreadable data loads as empty.
    fn load_log(&self) -> Result<AttendanceLog>;

    /// Idempotent upsert of one (date, person, prayer) mark.
    fn set_mark(&self, date: &str, person_id: &str, prayer: &str, present: bool) -> Result<()>;

    /// Strip a person from every date's sub-map (cascading delete).
    fn remove_person_marks(&self, person_id: &str) -> Result<()>;

    /// Replace the whole stored log (import path).
    fn replace_log(&self, log: &AttendanceLog) -> Result<()>;
}
