//! Domain primitives, aggregates and services.
//!
//! Purpose: define the allocation aggregate, the rules governing when an
//! allocation may be created, changed or removed, and the ports adapters
//! implement. Nothing in here depends on HTTP or SQL.
//!
//! Public surface:
//! - `Allocation` and its value types (`AllocationId`, `EmployeeId`,
//!   `VehicleId`, `Purpose`, `AllocationStatus`).
//! - `AllocationCommandService` / `AllocationQueryService`: the engine.
//! - `Error` / `ErrorCode`: transport-agnostic failures.
//! - `TraceId`: request correlation identifier.

mod allocation;
mod allocation_service;
pub mod error;
pub mod ports;
mod trace_id;

pub use self::allocation::{
    Allocation, AllocationChanges, AllocationDraft, AllocationFilter, AllocationId,
    AllocationStatus, AllocationValidationError, DEFAULT_PAGE_LIMIT, EmployeeId, IDENTIFIER_MAX,
    IDENTIFIER_MIN, MAX_PAGE_LIMIT, NewAllocation, PageRequest, Purpose, VehicleId,
    allocation_day, is_strictly_future,
};
pub use self::allocation_service::{AllocationCommandService, AllocationQueryService};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
