//! Test utilities shared by unit tests (in `src/`) and integration tests (in
//! `tests/`). Compiled only with the `test-support` feature.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::{AllocationCommandService, AllocationQueryService};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryAllocationRepository;

/// Clock whose current instant tests can move forward.
#[derive(Debug)]
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance(&self, delta: TimeDelta) {
        *self.lock_clock() += delta;
    }

    pub fn advance_days(&self, days: i64) {
        self.advance(TimeDelta::days(days));
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// HTTP state wired to a fresh in-memory repository and the given clock.
pub fn in_memory_http_state(clock: Arc<MutableClock>) -> HttpState {
    let repo = Arc::new(InMemoryAllocationRepository::new());
    HttpState::new(
        Arc::new(AllocationCommandService::new(repo.clone(), clock)),
        Arc::new(AllocationQueryService::new(repo)),
    )
}
