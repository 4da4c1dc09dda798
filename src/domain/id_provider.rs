//! Id generation strategy for newly created people.
//!
//! The strategy is injected into `PersonService` so tests can control id
//! assignment deterministically while production gets collision-free ids.

use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Produces opaque, unique person ids.
pub trait IdProvider: Send + Sync {
    fn next_id(&self) -> String;
}

/// Production provider backed by random v4 UUIDs.
#[derive(Debug, Clone, Default)]
pub struct UuidIdProvider;

impl IdProvider for UuidIdProvider {
    fn next_id(&self) -> String {
        format!("person::{}", Uuid::new_v4())
    }
}

/// Deterministic provider yielding `person::1`, `person::2`, ... in order.
#[derive(Debug, Default)]
pub struct SequentialIdProvider {
    counter: AtomicU64,
}

impl SequentialIdProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdProvider for SequentialIdProvider {
    fn next_id(&self) -> String {
        format!("person::{}", self.counter.fetch_add(1, Ordering::SeqCst) + 1)
    }
}
