//! In-memory adapters used by tests and database-less local runs.

mod in_memory_allocation_repository;

pub use in_memory_allocation_repository::InMemoryAllocationRepository;
