//! Driving port for allocation history reads.

use async_trait::async_trait;

use crate::domain::{Allocation, AllocationFilter, Error, PageRequest};

/// Request to list allocations matching a filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListAllocationsRequest {
    pub filter: AllocationFilter,
    pub page: PageRequest,
}

/// Driving port for allocation read operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AllocationQuery: Send + Sync {
    /// Return one page of matching allocations, newest allocation date first.
    async fn list_allocations(
        &self,
        request: ListAllocationsRequest,
    ) -> Result<Vec<Allocation>, Error>;
}
