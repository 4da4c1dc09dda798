//! # Domain Module
//!
//! Contains all business logic for the attendance tracker.
//!
//! This module encapsulates the entities, rules and services that define
//! how attendance is recorded and how every reporting view is derived.
//! It operates independently of any UI framework; storage goes through
//! the trait-based repositories in `crate::storage`.
//!
//! ## Module Organization
//!
//! - **person_service**: people register CRUD with validation and
//!   cascading delete
//! - **attendance_service**: raw per-(date, person, prayer) marks
//! - **prayer_calendar**: which prayers apply to which date
//! - **stats_service**: all derived statistics, recomputed on demand
//! - **exchange_service**: tabular export/import of the full state
//! - **notification_service**: reminder composition and hand-off
//!
//! ## Core Rules
//!
//! - Every date carries the five daily prayers; Fridays add Jumuah
//! - Unmarked always means absent; the log is sparse at every level
//! - Scoring only ever considers prayers applicable on the scored date
//! - Derived figures are never persisted

pub mod attendance_service;
pub mod commands;
pub mod exchange_service;
pub mod id_provider;
pub mod models;
pub mod notification_service;
pub mod person_service;
pub mod prayer_calendar;
pub mod stats_service;

pub use attendance_service::AttendanceService;
pub use exchange_service::ExchangeService;
pub use id_provider::{IdProvider, SequentialIdProvider, UuidIdProvider};
pub use notification_service::{DeepLinkLogger, NotificationSender, NotificationService};
pub use person_service::{PersonService, PersonValidationError};
pub use prayer_calendar::PrayerCalendar;
pub use stats_service::StatsService;
