use anyhow::Result;
use log::{info, warn};
use std::sync::Arc;

use crate::domain::commands::people::{
    CreatePersonCommand, CreatePersonResult, DeletePersonCommand, DeletePersonResult,
    GetPersonCommand, GetPersonResult, ListPeopleResult, UpdatePersonCommand, UpdatePersonResult,
};
use crate::domain::id_provider::IdProvider;
use crate::domain::models::person::Person as DomainPerson;
use crate::storage::json::{AttendanceRepository, JsonConnection, PersonRepository};
use crate::storage::traits::{AttendanceStorage, PersonStorage};

/// Validation failures when adding or editing a person.
#[derive(Debug, thiserror::Error)]
pub enum PersonValidationError {
    #[error("Name and mobile number are required")]
    MissingRequiredField,
    #[error("Please enter a valid mobile number (7-15 digits)")]
    InvalidMobile,
    #[error("A person with this mobile number already exists")]
    DuplicateMobile,
}

/// Service for managing the people register.
#[derive(Clone)]
pub struct PersonService {
    person_repository: PersonRepository,
    attendance_repository: AttendanceRepository,
    id_provider: Arc<dyn IdProvider>,
}

impl PersonService {
    pub fn new(connection: Arc<JsonConnection>, id_provider: Arc<dyn IdProvider>) -> Self {
        Self {
            person_repository: PersonRepository::new(connection.clone()),
            attendance_repository: AttendanceRepository::new(connection),
            id_provider,
        }
    }

    /// Add a new person. Inputs are trimmed before validation; a rejected
    /// command leaves stored state unchanged.
    pub fn create_person(&self, command: CreatePersonCommand) -> Result<CreatePersonResult> {
        info!("Creating person: name={}", command.name.trim());

        let name = command.name.trim().to_string();
        let mobile = command.mobile.trim().to_string();
        let address = command.address.trim().to_string();

        self.validate_new_person(&name, &mobile)?;

        let person = DomainPerson {
            id: self.id_provider.next_id(),
            name,
            mobile,
            address,
        };

        self.person_repository.store_person(&person)?;

        info!("Created person: {} with ID: {}", person.name, person.id);

        Ok(CreatePersonResult { person })
    }

    /// Get a person by id.
    pub fn get_person(&self, command: GetPersonCommand) -> Result<GetPersonResult> {
        let person = self.person_repository.get_person(&command.person_id)?;
        if person.is_none() {
            warn!("Person not found: {}", command.person_id);
        }
        Ok(GetPersonResult { person })
    }

    /// List all people in stored order.
    pub fn list_people(&self) -> Result<ListPeopleResult> {
        let people = self.person_repository.list_people()?;
        Ok(ListPeopleResult { people })
    }

    /// Edit a person in place. Provided fields replace the stored values
    /// after trimming; clearing name or mobile is rejected. Known
    /// limitation: mobile format and uniqueness are NOT re-checked on
    /// edit, only at create time.
    pub fn update_person(&self, command: UpdatePersonCommand) -> Result<UpdatePersonResult> {
        info!("Updating person: {}", command.person_id);

        let mut person = self
            .person_repository
            .get_person(&command.person_id)?
            .ok_or_else(|| anyhow::anyhow!("Person not found: {}", command.person_id))?;

        if let Some(name) = command.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(PersonValidationError::MissingRequiredField.into());
            }
            person.name = name;
        }
        if let Some(mobile) = command.mobile {
            let mobile = mobile.trim().to_string();
            if mobile.is_empty() {
                return Err(PersonValidationError::MissingRequiredField.into());
            }
            person.mobile = mobile;
        }
        if let Some(address) = command.address {
            person.address = address.trim().to_string();
        }

        self.person_repository.update_person(&person)?;

        info!("Updated person: {} with ID: {}", person.name, person.id);

        Ok(UpdatePersonResult { person })
    }

    /// Delete a person and cascade the delete through the attendance log
    /// so no date keeps a reference to the removed id.
    pub fn delete_person(&self, command: DeletePersonCommand) -> Result<DeletePersonResult> {
        info!("Deleting person: {}", command.person_id);

        let person = self
            .person_repository
            .get_person(&command.person_id)?
            .ok_or_else(|| anyhow::anyhow!("Person not found: {}", command.person_id))?;

        self.person_repository.delete_person(&command.person_id)?;
        self.attendance_repository
            .remove_person_marks(&command.person_id)?;

        info!("Deleted person: {} with ID: {}", person.name, person.id);

        Ok(DeletePersonResult {
            success_message: format!("Person '{}' deleted successfully", person.name),
        })
    }

    fn validate_new_person(&self, name: &str, mobile: &str) -> Result<()> {
        if name.is_empty() || mobile.is_empty() {
            return Err(PersonValidationError::MissingRequiredField.into());
        }
        if !is_valid_mobile(mobile) {
            return Err(PersonValidationError::InvalidMobile.into());
        }
        if self.person_repository.find_person_by_mobile(mobile)?.is_some() {
            return Err(PersonValidationError::DuplicateMobile.into());
        }
        Ok(())
    }
}

/// 7 to 15 ASCII digits, nothing else.
fn is_valid_mobile(mobile: &str) -> bool {
    (7..=15).contains(&mobile.len()) && mobile.chars().all(|c| c.is_ascii_digit())
}
