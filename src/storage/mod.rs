//! Storage layer: trait definitions and the JSON file backend.

pub mod json;
pub mod traits;

pub use json::JsonConnection;
pub use traits::{AttendanceStorage, PersonStorage};
