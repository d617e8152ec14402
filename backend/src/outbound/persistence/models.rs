//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::allocations;

/// Row struct for reading from the allocations table.
///
/// `allocation_day` is derived from `allocation_date` and is only used in
/// filters, so it is not selected.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = allocations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AllocationRow {
    pub id: Uuid,
    pub employee_id: i32,
    pub vehicle_id: i32,
    pub allocation_date: DateTime<Utc>,
    pub purpose: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new allocation records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = allocations)]
pub(crate) struct NewAllocationRow<'a> {
    pub id: Uuid,
    pub employee_id: i32,
    pub vehicle_id: i32,
    pub allocation_date: DateTime<Utc>,
    pub allocation_day: NaiveDate,
    pub purpose: &'a str,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset struct for partial allocation updates.
///
/// `None` fields are left untouched by Diesel.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = allocations)]
pub(crate) struct AllocationUpdate<'a> {
    pub purpose: Option<&'a str>,
    pub status: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}
