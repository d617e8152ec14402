//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the allocation and health endpoints together with
//! the schema wrappers from [`crate::inbound::http::schemas`]. The generated
//! document backs Swagger UI in debug builds and the `openapi-dump` binary.

use crate::inbound::http::allocations::{
    AllocationResponse, CreateAllocationRequestBody, UpdateAllocationRequestBody,
};
use crate::inbound::http::schemas::{AllocationStatusSchema, ErrorCodeSchema, ErrorSchema};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vehicle allocation API",
        description = "Book fleet vehicles for employees on future days and query allocation history."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::allocations::create_allocation,
        crate::inbound::http::allocations::update_allocation,
        crate::inbound::http::allocations::delete_allocation,
        crate::inbound::http::allocations::list_allocations,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        AllocationResponse,
        CreateAllocationRequestBody,
        UpdateAllocationRequestBody,
        AllocationStatusSchema,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "allocations", description = "Vehicle allocation lifecycle"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
