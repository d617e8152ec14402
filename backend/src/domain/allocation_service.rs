//! Allocation admission, lifecycle and history services.
//!
//! The command service decides when an allocation may be created, mutated or
//! removed; the query service reconstructs allocation history. Both hold only
//! `Arc` handles to their repository and clock, so they are cheap to clone and
//! carry no state of their own between calls.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    AllocationCommand, AllocationQuery, AllocationRepository, AllocationRepositoryError,
    CreateAllocationRequest, DeleteAllocationRequest, ListAllocationsRequest,
    UpdateAllocationRequest,
};
use crate::domain::{
    Allocation, AllocationChanges, AllocationId, AllocationStatus, Error, NewAllocation,
    is_strictly_future,
};

pub(crate) const FUTURE_DATE_REQUIRED: &str = "Allocation can only be made for future dates";
pub(crate) const VEHICLE_ALREADY_ALLOCATED: &str = "Vehicle already allocated for this date";
pub(crate) const ALLOCATION_NOT_FOUND: &str = "Allocation not found";
pub(crate) const UPDATE_LOCKED: &str = "Cannot update past or current allocations";
pub(crate) const DELETE_LOCKED: &str = "Cannot delete past or current allocations";

fn map_repository_error(error: AllocationRepositoryError) -> Error {
    match error {
        AllocationRepositoryError::Connection { message } => {
            warn!(%message, "allocation repository unavailable");
            Error::service_unavailable(format!("allocation repository unavailable: {message}"))
        }
        AllocationRepositoryError::Query { message } => {
            warn!(%message, "allocation repository query failed");
            Error::internal(format!("allocation repository error: {message}"))
        }
        AllocationRepositoryError::Conflict { message } => {
            debug!(%message, "store rejected duplicate vehicle allocation");
            Error::vehicle_already_allocated(VEHICLE_ALREADY_ALLOCATED)
        }
    }
}

fn not_found(id: &AllocationId) -> Error {
    debug!(allocation_id = %id, "allocation not found");
    Error::not_found(ALLOCATION_NOT_FOUND).with_details(json!({ "id": id.to_string() }))
}

/// Allocation service implementing the command driving port.
pub struct AllocationCommandService<R: ?Sized> {
    allocation_repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: ?Sized> Clone for AllocationCommandService<R> {
    fn clone(&self) -> Self {
        Self {
            allocation_repo: Arc::clone(&self.allocation_repo),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R: ?Sized> AllocationCommandService<R> {
    /// Create a new command service with the allocation repository and clock.
    pub fn new(allocation_repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            allocation_repo,
            clock,
        }
    }
}

impl<R> AllocationCommandService<R>
where
    R: AllocationRepository + ?Sized,
{
    /// Load an allocation that is still open for modification.
    async fn load_modifiable(
        &self,
        id: &AllocationId,
        locked_message: &'static str,
    ) -> Result<Allocation, Error> {
        let existing = self
            .allocation_repo
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(id))?;

        if !existing.is_modifiable_at(self.clock.utc()) {
            debug!(allocation_id = %id, date = %existing.allocation_date(), "allocation is locked");
            return Err(Error::invalid_date(locked_message).with_details(json!({
                "id": id.to_string(),
                "allocation_date": existing.allocation_date().to_rfc3339(),
            })));
        }
        Ok(existing)
    }

    /// Reject a status change that would give the vehicle a second live
    /// allocation on the same day.
    async fn ensure_slot_free_for(
        &self,
        existing: &Allocation,
        next: AllocationStatus,
    ) -> Result<(), Error> {
        if existing.status().occupies_slot() || !next.occupies_slot() {
            return Ok(());
        }

        let holder = self
            .allocation_repo
            .find_active_for_vehicle_on(existing.vehicle_id(), existing.allocation_day())
            .await
            .map_err(map_repository_error)?;

        match holder {
            Some(other) if other.id() != existing.id() => {
                debug!(
                    allocation_id = %existing.id(),
                    holder_id = %other.id(),
                    "reactivation blocked by existing allocation"
                );
                Err(Error::vehicle_already_allocated(VEHICLE_ALREADY_ALLOCATED))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<R> AllocationCommand for AllocationCommandService<R>
where
    R: AllocationRepository + ?Sized,
{
    async fn create_allocation(
        &self,
        request: CreateAllocationRequest,
    ) -> Result<Allocation, Error> {
        let now = self.clock.utc();
        if !is_strictly_future(request.allocation_date, now) {
            debug!(date = %request.allocation_date, "rejected allocation for non-future date");
            return Err(Error::invalid_date(FUTURE_DATE_REQUIRED).with_details(json!({
                "field": "allocation_date",
                "value": request.allocation_date.to_rfc3339(),
            })));
        }

        let new_allocation = NewAllocation {
            employee_id: request.employee_id,
            vehicle_id: request.vehicle_id,
            allocation_date: request.allocation_date,
            purpose: request.purpose,
            status: AllocationStatus::default(),
            created_at: now,
        };

        let holder = self
            .allocation_repo
            .find_active_for_vehicle_on(new_allocation.vehicle_id, new_allocation.allocation_day())
            .await
            .map_err(map_repository_error)?;
        if let Some(existing) = holder {
            debug!(
                vehicle_id = %new_allocation.vehicle_id,
                holder_id = %existing.id(),
                "vehicle already allocated"
            );
            return Err(Error::vehicle_already_allocated(VEHICLE_ALREADY_ALLOCATED));
        }

        let created = self
            .allocation_repo
            .insert(&new_allocation)
            .await
            .map_err(map_repository_error)?;

        info!(
            allocation_id = %created.id(),
            vehicle_id = %created.vehicle_id(),
            employee_id = %created.employee_id(),
            day = %created.allocation_day(),
            "allocation created"
        );
        Ok(created)
    }

    async fn update_allocation(
        &self,
        request: UpdateAllocationRequest,
    ) -> Result<Allocation, Error> {
        let existing = self.load_modifiable(&request.id, UPDATE_LOCKED).await?;

        if let Some(next) = request.status {
            if !existing.status().permits_transition_to(next) {
                return Err(Error::invalid_request(format!(
                    "cannot change allocation status from {} to {next}",
                    existing.status()
                )));
            }
            self.ensure_slot_free_for(&existing, next).await?;
        }

        let changes = AllocationChanges {
            purpose: request.purpose,
            status: request.status,
            updated_at: self.clock.utc(),
        };

        let updated = self
            .allocation_repo
            .update(&request.id, &changes)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(&request.id))?;

        info!(
            allocation_id = %updated.id(),
            status = %updated.status(),
            "allocation updated"
        );
        Ok(updated)
    }

    async fn delete_allocation(&self, request: DeleteAllocationRequest) -> Result<(), Error> {
        self.load_modifiable(&request.id, DELETE_LOCKED).await?;

        let deleted = self
            .allocation_repo
            .delete(&request.id)
            .await
            .map_err(map_repository_error)?;
        if !deleted {
            return Err(not_found(&request.id));
        }

        info!(allocation_id = %request.id, "allocation deleted");
        Ok(())
    }
}

/// Allocation service implementing the query driving port.
pub struct AllocationQueryService<R: ?Sized> {
    allocation_repo: Arc<R>,
}

impl<R: ?Sized> Clone for AllocationQueryService<R> {
    fn clone(&self) -> Self {
        Self {
            allocation_repo: Arc::clone(&self.allocation_repo),
        }
    }
}

impl<R: ?Sized> AllocationQueryService<R> {
    /// Create a new query service with the allocation repository.
    pub fn new(allocation_repo: Arc<R>) -> Self {
        Self { allocation_repo }
    }
}

#[async_trait]
impl<R> AllocationQuery for AllocationQueryService<R>
where
    R: AllocationRepository + ?Sized,
{
    async fn list_allocations(
        &self,
        request: ListAllocationsRequest,
    ) -> Result<Vec<Allocation>, Error> {
        let allocations = self
            .allocation_repo
            .list(&request.filter, request.page)
            .await
            .map_err(map_repository_error)?;

        debug!(
            count = allocations.len(),
            skip = request.page.skip(),
            limit = request.page.limit(),
            "allocations listed"
        );
        Ok(allocations)
    }
}

#[cfg(test)]
#[path = "allocation_service_tests.rs"]
mod tests;
