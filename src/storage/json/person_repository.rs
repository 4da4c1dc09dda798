//! JSON-backed implementation of the `PersonStorage` trait.
//!
//! The whole collection lives in a single `people.json` document (a JSON
//! array of Person, in insertion order). Every mutation reads the document,
//! applies the change in memory and writes the document back atomically, so
//! the on-disk copy is durable before the call returns.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::sync::Arc;

use super::connection::JsonConnection;
use crate::domain::models::person::Person as DomainPerson;
use crate::storage::traits::PersonStorage;

#[derive(Clone)]
pub struct PersonRepository {
    connection: Arc<JsonConnection>,
}

impl PersonRepository {
    pub fn new(connection: Arc<JsonConnection>) -> Self {
        Self { connection }
    }

    /// Read the stored collection. Missing or unparseable data loads as an
    /// empty collection rather than an error.
    fn read_people(&self) -> Vec<DomainPerson> {
        let path = self.connection.people_file_path();

        if !path.exists() {
            debug!("People document does not exist yet, starting empty");
            return Vec::new();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(people) => people,
                Err(e) => {
                    warn!(
                        "People document at {} is unreadable, starting empty: {}",
                        path.display(),
                        e
                    );
                    Vec::new()
                }
            },
            Err(e) => {
                warn!(
                    "Failed to read people document at {}, starting empty: {}",
                    path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Write the collection back atomically (temp file, then rename).
    fn write_people(&self, people: &[DomainPerson]) -> Result<()> {
        let path = self.connection.people_file_path();
        let json = serde_json::to_string_pretty(people)?;

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, json)
            .with_context(|| format!("Failed to write people document to {}", path.display()))?;
        fs::rename(&temp_path, &path)?;

        debug!("Saved {} people to {}", people.len(), path.display());
        Ok(())
    }
}

impl PersonStorage for PersonRepository {
    fn store_person(&self, person: &DomainPerson) -> Result<()> {
        let mut people = self.read_people();
        people.push(person.clone());
        self.write_people(&people)
    }

    fn get_person(&self, person_id: &str) -> Result<Option<DomainPerson>> {
        Ok(self
            .read_people()
            .into_iter()
            .find(|p| p.id == person_id))
    }

    fn find_person_by_mobile(&self, mobile: &str) -> Result<Option<DomainPerson>> {
        Ok(self
            .read_people()
            .into_iter()
            .find(|p| p.mobile == mobile))
    }

    fn list_people(&self) -> Result<Vec<DomainPerson>> {
        Ok(self.read_people())
    }

    fn update_person(&self, person: &DomainPerson) -> Result<()> {
        let mut people = self.read_people();
        match people.iter_mut().find(|p| p.id == person.id) {
            Some(existing) => {
                *existing = person.clone();
                self.write_people(&people)
            }
            None => {
                warn!("Attempted to update a non-existent person: {}", person.id);
                Err(anyhow::anyhow!("Person not found for update"))
            }
        }
    }

    fn delete_person(&self, person_id: &str) -> Result<bool> {
        let mut people = self.read_people();
        let before = people.len();
        people.retain(|p| p.id != person_id);
        if people.len() == before {
            warn!("Attempted to delete a non-existent person: {}", person_id);
            return Ok(false);
        }
        self.write_people(&people)?;
        Ok(true)
    }

    fn replace_all_people(&self, people: &[DomainPerson]) -> Result<()> {
        self.write_people(people)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_repo() -> (PersonRepository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let connection = Arc::new(JsonConnection::new(temp_dir.path()).unwrap());
        (PersonRepository::new(connection), temp_dir)
    }

    fn person(id: &str, mobile: &str) -> DomainPerson {
        DomainPerson {
            id: id.to_string(),
            name: format!("Person {}", id),
            mobile: mobile.to_string(),
            address: String::new(),
        }
    }

    #[test]
    fn store_and_list_preserves_insertion_order() {
        let (repo, _temp_dir) = setup_test_repo();
        repo.store_person(&person("p1", "5551234567")).unwrap();
        repo.store_person(&person("p2", "5559876543")).unwrap();

        let people = repo.list_people().unwrap();
        assert_eq!(people.len(), 2);
        assert_eq!(people[0].id, "p1");
        assert_eq!(people[1].id, "p2");
    }

    #[test]
    fn lookup_by_id_and_mobile() {
        let (repo, _temp_dir) = setup_test_repo();
        repo.store_person(&person("p1", "5551234567")).unwrap();

        assert!(repo.get_person("p1").unwrap().is_some());
        assert!(repo.get_person("p2").unwrap().is_none());
        assert!(repo.find_person_by_mobile("5551234567").unwrap().is_some());
        assert!(repo.find_person_by_mobile("0000000").unwrap().is_none());
    }

    #[test]
    fn update_replaces_fields_in_place() {
        let (repo, _temp_dir) = setup_test_repo();
        repo.store_person(&person("p1", "5551234567")).unwrap();

        let mut updated = person("p1", "5551234567");
        updated.name = "Renamed".to_string();
        repo.update_person(&updated).unwrap();

        assert_eq!(repo.get_person("p1").unwrap().unwrap().name, "Renamed");
    }

    #[test]
    fn update_of_unknown_person_fails() {
        let (repo, _temp_dir) = setup_test_repo();
        assert!(repo.update_person(&person("ghost", "5551234567")).is_err());
    }

    #[test]
    fn delete_reports_whether_anything_was_removed() {
        let (repo, _temp_dir) = setup_test_repo();
        repo.store_person(&person("p1", "5551234567")).unwrap();

        assert!(repo.delete_person("p1").unwrap());
        assert!(!repo.delete_person("p1").unwrap());
        assert!(repo.list_people().unwrap().is_empty());
    }

    #[test]
    fn corrupt_document_loads_as_empty() {
        let (repo, temp_dir) = setup_test_repo();
        fs::write(temp_dir.path().join("people.json"), "{ not json").unwrap();
        assert!(repo.list_people().unwrap().is_empty());
    }
}
