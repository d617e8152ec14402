//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they depend only
//! on driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AllocationCommand, AllocationQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub allocations: Arc<dyn AllocationCommand>,
    pub allocations_query: Arc<dyn AllocationQuery>,
}

impl HttpState {
    /// Construct state from the command and query ports.
    pub fn new(
        allocations: Arc<dyn AllocationCommand>,
        allocations_query: Arc<dyn AllocationQuery>,
    ) -> Self {
        Self {
            allocations,
            allocations_query,
        }
    }
}
