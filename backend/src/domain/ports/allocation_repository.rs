//! Port for allocation persistence.
//!
//! Adapters must enforce the vehicle/day exclusivity rule themselves: at most
//! one allocation whose status occupies the slot may exist per vehicle and UTC
//! calendar day. Violations surface as [`AllocationRepositoryError::Conflict`].

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{
    Allocation, AllocationChanges, AllocationFilter, AllocationId, NewAllocation, PageRequest,
    VehicleId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by allocation repository adapters.
    pub enum AllocationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "allocation repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "allocation repository query failed: {message}",
        /// The write would give a vehicle two live allocations on one day.
        Conflict { message: String } =>
            "allocation repository conflict: {message}",
    }
}

/// Port for storing and reading allocations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AllocationRepository: Send + Sync {
    /// Insert a new allocation and return it with its assigned id.
    async fn insert(&self, allocation: &NewAllocation)
    -> Result<Allocation, AllocationRepositoryError>;

    /// Find an allocation by id.
    async fn find_by_id(
        &self,
        id: &AllocationId,
    ) -> Result<Option<Allocation>, AllocationRepositoryError>;

    /// Find the allocation currently holding the vehicle's slot on `day`.
    async fn find_active_for_vehicle_on(
        &self,
        vehicle_id: VehicleId,
        day: NaiveDate,
    ) -> Result<Option<Allocation>, AllocationRepositoryError>;

    /// Apply a partial update, returning the stored result or `None` when the
    /// id no longer resolves.
    async fn update(
        &self,
        id: &AllocationId,
        changes: &AllocationChanges,
    ) -> Result<Option<Allocation>, AllocationRepositoryError>;

    /// Remove an allocation, returning whether a record was deleted.
    async fn delete(&self, id: &AllocationId) -> Result<bool, AllocationRepositoryError>;

    /// List matching allocations newest first, ties broken by descending id.
    async fn list(
        &self,
        filter: &AllocationFilter,
        page: PageRequest,
    ) -> Result<Vec<Allocation>, AllocationRepositoryError>;
}
