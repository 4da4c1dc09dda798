//! # JSON Storage Module
//!
//! File-based storage implementation for the attendance tracker. The two
//! persisted collections are independent JSON documents under one base
//! directory:
//!
//! ```text
//! data/
//! ├── people.json        ← array of Person, insertion order
//! └── attendance.json    ← date -> person id -> prayer -> bool
//! ```
//!
//! ## Features
//!
//! - Whole-document reads and writes; every mutation is durable before the
//!   call returns
//! - Atomic writes with temp files
//! - Missing or corrupt documents load as empty collections, never errors

pub mod attendance_repository;
pub mod connection;
pub mod person_repository;

#[cfg(test)]
pub mod test_utils;

pub use attendance_repository::AttendanceRepository;
pub use connection::JsonConnection;
pub use person_repository::PersonRepository;
