//! Vehicle allocation HTTP handlers.
//!
//! ```text
//! POST   /api/v1/allocations
//! PATCH  /api/v1/allocations/{id}
//! DELETE /api/v1/allocations/{id}
//! GET    /api/v1/allocations
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{
    CreateAllocationRequest, DeleteAllocationRequest, ListAllocationsRequest,
    UpdateAllocationRequest,
};
use crate::domain::{Allocation, AllocationFilter, Error, Purpose};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{AllocationStatusSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    ALLOCATION_DATE, END_DATE, EMPLOYEE_ID, PURPOSE, START_DATE, VEHICLE_ID, blank_to_none,
    missing_field_error, parse_allocation_date, parse_allocation_id, parse_employee_id,
    parse_optional_allocation_date, parse_optional_employee_id, parse_optional_status,
    parse_optional_vehicle_id, parse_page, parse_vehicle_id,
};

/// Request payload for creating an allocation.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateAllocationRequestBody {
    #[schema(minimum = 1, maximum = 1000, example = 42)]
    pub employee_id: Option<i64>,
    #[schema(minimum = 1, maximum = 1000, example = 7)]
    pub vehicle_id: Option<i64>,
    /// RFC 3339 timestamp or `YYYY-MM-DD` date; must fall after today (UTC).
    #[schema(example = "2030-05-04T09:00:00Z")]
    pub allocation_date: Option<String>,
    #[schema(example = "Client site visit")]
    pub purpose: Option<String>,
}

/// Request payload for a partial allocation update.
///
/// `null`, absent and empty fields leave the stored value untouched.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateAllocationRequestBody {
    pub purpose: Option<String>,
    #[schema(value_type = Option<AllocationStatusSchema>)]
    pub status: Option<String>,
}

/// Query parameters for listing allocations.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListAllocationsQuery {
    /// Inclusive lower bound on `allocation_date`.
    pub start_date: Option<String>,
    /// Inclusive upper bound on `allocation_date`.
    pub end_date: Option<String>,
    pub employee_id: Option<String>,
    pub vehicle_id: Option<String>,
    #[param(value_type = Option<AllocationStatusSchema>)]
    pub status: Option<String>,
    /// Records to skip; defaults to 0.
    pub skip: Option<String>,
    /// Page size between 1 and 100; defaults to 50.
    pub limit: Option<String>,
}

/// Allocation representation returned to clients.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AllocationResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    pub employee_id: u16,
    pub vehicle_id: u16,
    pub allocation_date: String,
    pub purpose: String,
    #[schema(value_type = AllocationStatusSchema)]
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Allocation> for AllocationResponse {
    fn from(value: Allocation) -> Self {
        Self {
            id: value.id().to_string(),
            employee_id: value.employee_id().get(),
            vehicle_id: value.vehicle_id().get(),
            allocation_date: value.allocation_date().to_rfc3339(),
            purpose: value.purpose().as_str().to_owned(),
            status: value.status().to_string(),
            created_at: value.created_at().to_rfc3339(),
            updated_at: value.updated_at().to_rfc3339(),
        }
    }
}

fn parse_create_request(
    payload: CreateAllocationRequestBody,
) -> Result<CreateAllocationRequest, Error> {
    let employee_id = payload
        .employee_id
        .ok_or_else(|| missing_field_error(EMPLOYEE_ID))?;
    let vehicle_id = payload
        .vehicle_id
        .ok_or_else(|| missing_field_error(VEHICLE_ID))?;
    let allocation_date = blank_to_none(payload.allocation_date)
        .ok_or_else(|| missing_field_error(ALLOCATION_DATE))?;
    let purpose = blank_to_none(payload.purpose)
        .and_then(|raw| Purpose::new(raw).ok())
        .ok_or_else(|| missing_field_error(PURPOSE))?;

    Ok(CreateAllocationRequest {
        employee_id: parse_employee_id(employee_id)?,
        vehicle_id: parse_vehicle_id(vehicle_id)?,
        allocation_date: parse_allocation_date(&allocation_date, ALLOCATION_DATE)?,
        purpose,
    })
}

fn parse_update_request(
    raw_id: &str,
    payload: UpdateAllocationRequestBody,
) -> Result<UpdateAllocationRequest, Error> {
    let id = parse_allocation_id(raw_id)?;
    let purpose = blank_to_none(payload.purpose).and_then(|raw| Purpose::new(raw).ok());
    let status = parse_optional_status(payload.status)?;
    Ok(UpdateAllocationRequest {
        id,
        purpose,
        status,
    })
}

fn parse_list_query(query: ListAllocationsQuery) -> Result<ListAllocationsRequest, Error> {
    let filter = AllocationFilter {
        start_date: parse_optional_allocation_date(query.start_date, START_DATE)?,
        end_date: parse_optional_allocation_date(query.end_date, END_DATE)?,
        employee_id: parse_optional_employee_id(query.employee_id)?,
        vehicle_id: parse_optional_vehicle_id(query.vehicle_id)?,
        status: parse_optional_status(query.status)?,
    };
    let page = parse_page(query.skip, query.limit)?;
    Ok(ListAllocationsRequest { filter, page })
}

/// Create an allocation for a future day.
#[utoipa::path(
    post,
    path = "/api/v1/allocations",
    request_body = CreateAllocationRequestBody,
    responses(
        (status = 201, description = "Allocation created", body = AllocationResponse),
        (
            status = 400,
            description = "Invalid request, non-future date or vehicle already allocated",
            body = ErrorSchema
        ),
        (status = 503, description = "Allocation store unavailable", body = ErrorSchema)
    ),
    tags = ["allocations"],
    operation_id = "createAllocation"
)]
#[post("/allocations")]
pub async fn create_allocation(
    state: web::Data<HttpState>,
    payload: web::Json<CreateAllocationRequestBody>,
) -> ApiResult<HttpResponse> {
    let request = parse_create_request(payload.into_inner())?;
    let created = state.allocations.create_allocation(request).await?;
    Ok(HttpResponse::Created().json(AllocationResponse::from(created)))
}

/// Update the purpose and/or status of a future allocation.
#[utoipa::path(
    patch,
    path = "/api/v1/allocations/{id}",
    request_body = UpdateAllocationRequestBody,
    params(("id" = String, Path, description = "Allocation identifier")),
    responses(
        (status = 200, description = "Updated allocation", body = AllocationResponse),
        (status = 400, description = "Allocation is locked or request invalid", body = ErrorSchema),
        (status = 404, description = "Allocation not found", body = ErrorSchema),
        (status = 503, description = "Allocation store unavailable", body = ErrorSchema)
    ),
    tags = ["allocations"],
    operation_id = "updateAllocation"
)]
#[patch("/allocations/{id}")]
pub async fn update_allocation(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateAllocationRequestBody>,
) -> ApiResult<web::Json<AllocationResponse>> {
    let request = parse_update_request(&path.into_inner(), payload.into_inner())?;
    let updated = state.allocations.update_allocation(request).await?;
    Ok(web::Json(AllocationResponse::from(updated)))
}

/// Delete a future allocation.
#[utoipa::path(
    delete,
    path = "/api/v1/allocations/{id}",
    params(("id" = String, Path, description = "Allocation identifier")),
    responses(
        (status = 204, description = "Allocation deleted"),
        (status = 400, description = "Allocation is locked", body = ErrorSchema),
        (status = 404, description = "Allocation not found", body = ErrorSchema),
        (status = 503, description = "Allocation store unavailable", body = ErrorSchema)
    ),
    tags = ["allocations"],
    operation_id = "deleteAllocation"
)]
#[delete("/allocations/{id}")]
pub async fn delete_allocation(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_allocation_id(&path.into_inner())?;
    state
        .allocations
        .delete_allocation(DeleteAllocationRequest { id })
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// List allocations, newest allocation date first.
#[utoipa::path(
    get,
    path = "/api/v1/allocations",
    params(ListAllocationsQuery),
    responses(
        (status = 200, description = "Matching allocations", body = [AllocationResponse]),
        (status = 400, description = "Invalid filter or pagination", body = ErrorSchema),
        (status = 503, description = "Allocation store unavailable", body = ErrorSchema)
    ),
    tags = ["allocations"],
    operation_id = "listAllocations"
)]
#[get("/allocations")]
pub async fn list_allocations(
    state: web::Data<HttpState>,
    query: web::Query<ListAllocationsQuery>,
) -> ApiResult<web::Json<Vec<AllocationResponse>>> {
    let request = parse_list_query(query.into_inner())?;
    let allocations = state.allocations_query.list_allocations(request).await?;
    Ok(web::Json(
        allocations.into_iter().map(AllocationResponse::from).collect(),
    ))
}

#[cfg(test)]
#[path = "allocations_tests.rs"]
mod tests;
