//! In-memory `AllocationRepository` for local runs and tests.
//!
//! Mirrors the PostgreSQL adapter's semantics: a slot index keyed by vehicle
//! and UTC day plays the role of the partial unique index, and listings are
//! ordered by allocation date then id, both descending.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::ports::{AllocationRepository, AllocationRepositoryError};
use crate::domain::{
    Allocation, AllocationChanges, AllocationFilter, AllocationId, NewAllocation, PageRequest,
    VehicleId,
};

type SlotKey = (VehicleId, NaiveDate);

/// Thread-safe in-memory allocation repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAllocationRepository {
    state: Arc<RwLock<InMemoryAllocationState>>,
}

#[derive(Debug, Default)]
struct InMemoryAllocationState {
    allocations: HashMap<AllocationId, Allocation>,
    slot_index: HashMap<SlotKey, AllocationId>,
}

impl InMemoryAllocationRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl std::fmt::Display) -> AllocationRepositoryError {
    AllocationRepositoryError::connection(format!("allocation state lock poisoned: {err}"))
}

fn slot_conflict(key: SlotKey) -> AllocationRepositoryError {
    let (vehicle_id, day) = key;
    AllocationRepositoryError::conflict(format!(
        "vehicle {vehicle_id} already allocated on {day}"
    ))
}

fn slot_key(allocation: &Allocation) -> Option<SlotKey> {
    allocation
        .status()
        .occupies_slot()
        .then(|| (allocation.vehicle_id(), allocation.allocation_day()))
}

fn page_bounds(page: PageRequest) -> (usize, usize) {
    let skip = usize::try_from(page.skip()).unwrap_or(usize::MAX);
    (skip, usize::from(page.limit()))
}

#[async_trait]
impl AllocationRepository for InMemoryAllocationRepository {
    async fn insert(
        &self,
        allocation: &NewAllocation,
    ) -> Result<Allocation, AllocationRepositoryError> {
        let mut state = self.state.write().map_err(poisoned)?;

        let mut id = AllocationId::random();
        while state.allocations.contains_key(&id) {
            id = AllocationId::random();
        }
        let created = Allocation::from_new(id, allocation.clone());

        if let Some(key) = slot_key(&created) {
            if state.slot_index.contains_key(&key) {
                return Err(slot_conflict(key));
            }
            state.slot_index.insert(key, id);
        }
        state.allocations.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(
        &self,
        id: &AllocationId,
    ) -> Result<Option<Allocation>, AllocationRepositoryError> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.allocations.get(id).cloned())
    }

    async fn find_active_for_vehicle_on(
        &self,
        vehicle_id: VehicleId,
        day: NaiveDate,
    ) -> Result<Option<Allocation>, AllocationRepositoryError> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .slot_index
            .get(&(vehicle_id, day))
            .and_then(|id| state.allocations.get(id))
            .cloned())
    }

    async fn update(
        &self,
        id: &AllocationId,
        changes: &AllocationChanges,
    ) -> Result<Option<Allocation>, AllocationRepositoryError> {
        let mut state = self.state.write().map_err(poisoned)?;

        let Some(existing) = state.allocations.get(id).cloned() else {
            return Ok(None);
        };
        let old_key = slot_key(&existing);
        let updated = existing.with_changes(changes);
        let new_key = slot_key(&updated);

        if let Some(key) = new_key {
            if state.slot_index.get(&key).is_some_and(|holder| holder != id) {
                return Err(slot_conflict(key));
            }
        }
        if let Some(key) = old_key {
            state.slot_index.remove(&key);
        }
        if let Some(key) = new_key {
            state.slot_index.insert(key, *id);
        }

        state.allocations.insert(*id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: &AllocationId) -> Result<bool, AllocationRepositoryError> {
        let mut state = self.state.write().map_err(poisoned)?;
        let Some(removed) = state.allocations.remove(id) else {
            return Ok(false);
        };
        if let Some(key) = slot_key(&removed) {
            state.slot_index.remove(&key);
        }
        Ok(true)
    }

    async fn list(
        &self,
        filter: &AllocationFilter,
        page: PageRequest,
    ) -> Result<Vec<Allocation>, AllocationRepositoryError> {
        let state = self.state.read().map_err(poisoned)?;

        let mut matching: Vec<&Allocation> = state
            .allocations
            .values()
            .filter(|allocation| filter.matches(allocation))
            .collect();
        matching.sort_by(|left, right| {
            right
                .allocation_date()
                .cmp(&left.allocation_date())
                .then_with(|| right.id().cmp(&left.id()))
        });

        let (skip, limit) = page_bounds(page);
        Ok(matching
            .into_iter()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }
}
