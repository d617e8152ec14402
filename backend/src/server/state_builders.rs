//! Builders wiring repositories and services into HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use allocations::domain::ports::{AllocationCommand, AllocationQuery, AllocationRepository};
use allocations::domain::{AllocationCommandService, AllocationQueryService};
use allocations::inbound::http::state::HttpState;
use allocations::outbound::memory::InMemoryAllocationRepository;
use allocations::outbound::persistence::DieselAllocationRepository;

use super::ServerConfig;

fn build_allocation_pair<R>(
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
) -> (Arc<dyn AllocationCommand>, Arc<dyn AllocationQuery>)
where
    R: AllocationRepository + 'static,
{
    (
        Arc::new(AllocationCommandService::new(Arc::clone(&repo), clock)),
        Arc::new(AllocationQueryService::new(repo)),
    )
}

/// Build the shared HTTP state, backed by PostgreSQL when a pool is
/// configured and by memory otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let (command, query) = match &config.db_pool {
        Some(pool) => build_allocation_pair(
            Arc::new(DieselAllocationRepository::new(pool.clone())),
            clock,
        ),
        None => {
            info!("no database pool configured; allocations are kept in memory");
            build_allocation_pair(Arc::new(InMemoryAllocationRepository::new()), clock)
        }
    };
    web::Data::new(HttpState::new(command, query))
}
