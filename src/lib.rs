//! # Attendance Tracker Backend
//!
//! Core engine of a single-user attendance tracker for a masjid
//! congregation: a people register, per-prayer attendance marks across the
//! five daily prayers (plus Jumuah on Fridays), derived statistics, and a
//! tabular exchange format for backup and restore.
//!
//! The engine is UI-agnostic. A hosting shell (desktop app, web view,
//! CLI) constructs a [`Backend`] and calls its services directly:
//! - All operations are synchronous; every mutation is durable before the
//!   call returns
//! - State lives in two JSON documents under one data directory
//! - Derived statistics are recomputed from stored state on demand

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

pub mod domain;
pub mod storage;

pub use storage::json::JsonConnection;

/// Main backend struct that orchestrates all services
pub struct Backend {
    pub person_service: domain::PersonService,
    pub attendance_service: domain::AttendanceService,
    pub calendar: domain::PrayerCalendar,
    pub stats_service: domain::StatsService,
    pub exchange_service: domain::ExchangeService,
    pub notification_service: domain::NotificationService,
}

impl Backend {
    /// Create a backend rooted at an explicit data directory.
    pub fn new<P: AsRef<Path>>(data_directory: P) -> Result<Self> {
        let connection = Arc::new(JsonConnection::new(data_directory)?);
        Ok(Self::with_connection(connection))
    }

    /// Create a backend in the default data directory
    /// (`~/Documents/Masjid Attendance`).
    pub fn new_default() -> Result<Self> {
        let connection = Arc::new(JsonConnection::new_default()?);
        Ok(Self::with_connection(connection))
    }

    fn with_connection(connection: Arc<JsonConnection>) -> Self {
        let id_provider: Arc<dyn domain::IdProvider> = Arc::new(domain::UuidIdProvider);
        let sender: Arc<dyn domain::NotificationSender> = Arc::new(domain::DeepLinkLogger);

        Backend {
            person_service: domain::PersonService::new(connection.clone(), id_provider),
            attendance_service: domain::AttendanceService::new(connection.clone()),
            calendar: domain::PrayerCalendar::new(),
            stats_service: domain::StatsService::new(connection.clone()),
            exchange_service: domain::ExchangeService::new(connection),
            notification_service: domain::NotificationService::new(sender),
        }
    }
}
