//! PostgreSQL-backed `AllocationRepository` implementation using Diesel ORM.
//!
//! One live allocation per vehicle per UTC day is enforced by the partial
//! unique index `allocations_vehicle_day_active_idx`; violations surface as
//! `AllocationRepositoryError::Conflict`.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{AllocationRepository, AllocationRepositoryError};
use crate::domain::{
    Allocation, AllocationChanges, AllocationDraft, AllocationFilter, AllocationId,
    AllocationStatus, EmployeeId, NewAllocation, PageRequest, Purpose, VehicleId,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{AllocationRow, AllocationUpdate, NewAllocationRow};
use super::pool::DbPool;
use super::schema::allocations;

/// Diesel-backed implementation of the `AllocationRepository` port.
#[derive(Clone)]
pub struct DieselAllocationRepository {
    pool: DbPool,
}

impl DieselAllocationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn corrupt_row(id: uuid::Uuid, reason: impl std::fmt::Display) -> AllocationRepositoryError {
    warn!(allocation_id = %id, %reason, "stored allocation failed validation");
    AllocationRepositoryError::query(format!("stored allocation {id} is invalid: {reason}"))
}

/// Convert a database row to a domain `Allocation`.
fn row_to_allocation(row: AllocationRow) -> Result<Allocation, AllocationRepositoryError> {
    let id = row.id;
    let draft = AllocationDraft {
        id: AllocationId::from_uuid(row.id),
        employee_id: EmployeeId::new(i64::from(row.employee_id))
            .map_err(|err| corrupt_row(id, err))?,
        vehicle_id: VehicleId::new(i64::from(row.vehicle_id))
            .map_err(|err| corrupt_row(id, err))?,
        allocation_date: row.allocation_date,
        purpose: Purpose::new(row.purpose).map_err(|err| corrupt_row(id, err))?,
        status: row
            .status
            .parse::<AllocationStatus>()
            .map_err(|err| corrupt_row(id, err))?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    };
    Allocation::new(draft).map_err(|err| corrupt_row(id, err))
}

fn rows_to_allocations(
    rows: Vec<AllocationRow>,
) -> Result<Vec<Allocation>, AllocationRepositoryError> {
    rows.into_iter().map(row_to_allocation).collect()
}

#[async_trait]
impl AllocationRepository for DieselAllocationRepository {
    async fn insert(
        &self,
        allocation: &NewAllocation,
    ) -> Result<Allocation, AllocationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewAllocationRow {
            id: *AllocationId::random().as_uuid(),
            employee_id: i32::from(allocation.employee_id.get()),
            vehicle_id: i32::from(allocation.vehicle_id.get()),
            allocation_date: allocation.allocation_date,
            allocation_day: allocation.allocation_day(),
            purpose: allocation.purpose.as_str(),
            status: allocation.status.as_str(),
            created_at: allocation.created_at,
            updated_at: allocation.created_at,
        };

        let row: AllocationRow = diesel::insert_into(allocations::table)
            .values(&new_row)
            .returning(AllocationRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_allocation(row)
    }

    async fn find_by_id(
        &self,
        id: &AllocationId,
    ) -> Result<Option<Allocation>, AllocationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<AllocationRow> = allocations::table
            .filter(allocations::id.eq(id.as_uuid()))
            .select(AllocationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_allocation).transpose()
    }

    async fn find_active_for_vehicle_on(
        &self,
        vehicle_id: VehicleId,
        day: NaiveDate,
    ) -> Result<Option<Allocation>, AllocationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<AllocationRow> = allocations::table
            .filter(allocations::vehicle_id.eq(i32::from(vehicle_id.get())))
            .filter(allocations::allocation_day.eq(day))
            .filter(allocations::status.ne(AllocationStatus::Cancelled.as_str()))
            .select(AllocationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_allocation).transpose()
    }

    async fn update(
        &self,
        id: &AllocationId,
        changes: &AllocationChanges,
    ) -> Result<Option<Allocation>, AllocationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let update = AllocationUpdate {
            purpose: changes.purpose.as_ref().map(Purpose::as_str),
            status: changes.status.map(AllocationStatus::as_str),
            updated_at: changes.updated_at,
        };

        let row: Option<AllocationRow> = diesel::update(allocations::table.find(id.as_uuid()))
            .set(&update)
            .returning(AllocationRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_allocation).transpose()
    }

    async fn delete(&self, id: &AllocationId) -> Result<bool, AllocationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::delete(allocations::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(removed > 0)
    }

    async fn list(
        &self,
        filter: &AllocationFilter,
        page: PageRequest,
    ) -> Result<Vec<Allocation>, AllocationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = allocations::table
            .select(AllocationRow::as_select())
            .into_boxed();
        if let Some(start) = filter.start_date {
            query = query.filter(allocations::allocation_date.ge(start));
        }
        if let Some(end) = filter.end_date {
            query = query.filter(allocations::allocation_date.le(end));
        }
        if let Some(employee_id) = filter.employee_id {
            query = query.filter(allocations::employee_id.eq(i32::from(employee_id.get())));
        }
        if let Some(vehicle_id) = filter.vehicle_id {
            query = query.filter(allocations::vehicle_id.eq(i32::from(vehicle_id.get())));
        }
        if let Some(status) = filter.status {
            query = query.filter(allocations::status.eq(status.as_str()));
        }

        let rows: Vec<AllocationRow> = query
            .order((allocations::allocation_date.desc(), allocations::id.desc()))
            .offset(i64::try_from(page.skip()).unwrap_or(i64::MAX))
            .limit(i64::from(page.limit()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows_to_allocations(rows)
    }
}
