//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod allocation_command;
mod allocation_query;
mod allocation_repository;

#[cfg(test)]
pub use allocation_command::MockAllocationCommand;
pub use allocation_command::{
    AllocationCommand, CreateAllocationRequest, DeleteAllocationRequest,
    UpdateAllocationRequest,
};
#[cfg(test)]
pub use allocation_query::MockAllocationQuery;
pub use allocation_query::{AllocationQuery, ListAllocationsRequest};
#[cfg(test)]
pub use allocation_repository::MockAllocationRepository;
pub use allocation_repository::{AllocationRepository, AllocationRepositoryError};
