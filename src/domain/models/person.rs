use serde::{Deserialize, Serialize};

/// Domain model representing a member of the congregation.
///
/// The `mobile` number doubles as the human-facing identity: it is required
/// to be unique when a person is added, and the exchange format re-keys
/// people by it on import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub name: String,
    pub mobile: String,
    #[serde(default)]
    pub address: String,
}
