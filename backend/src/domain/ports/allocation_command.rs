//! Driving port for allocation mutations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    Allocation, AllocationId, AllocationStatus, EmployeeId, Error, Purpose, VehicleId,
};

/// Request to allocate a vehicle to an employee for one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAllocationRequest {
    pub employee_id: EmployeeId,
    pub vehicle_id: VehicleId,
    pub allocation_date: DateTime<Utc>,
    pub purpose: Purpose,
}

/// Request to change the mutable fields of an allocation.
///
/// Absent fields are left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateAllocationRequest {
    pub id: AllocationId,
    pub purpose: Option<Purpose>,
    pub status: Option<AllocationStatus>,
}

/// Request to remove an allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteAllocationRequest {
    pub id: AllocationId,
}

/// Driving port for allocation write operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AllocationCommand: Send + Sync {
    /// Create a pending allocation for a future day.
    ///
    /// Fails with `invalid_date` when the day is today or earlier and with
    /// `vehicle_already_allocated` when the vehicle's slot is taken.
    async fn create_allocation(&self, request: CreateAllocationRequest)
    -> Result<Allocation, Error>;

    /// Update the purpose and/or status of a future allocation.
    async fn update_allocation(&self, request: UpdateAllocationRequest)
    -> Result<Allocation, Error>;

    /// Delete a future allocation.
    async fn delete_allocation(&self, request: DeleteAllocationRequest) -> Result<(), Error>;
}
