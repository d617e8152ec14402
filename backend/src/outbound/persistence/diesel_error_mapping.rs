//! Diesel and pool error mapping for the allocation repository.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::AllocationRepositoryError;

use super::pool::PoolError;

/// Partial unique index guarding one live allocation per vehicle per day.
pub(crate) const VEHICLE_DAY_INDEX: &str = "allocations_vehicle_day_active_idx";

/// Map pool errors to repository connection errors.
pub(crate) fn map_pool_error(error: PoolError) -> AllocationRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            AllocationRepositoryError::connection(message)
        }
    }
}

/// Map Diesel errors to repository errors.
///
/// A unique violation on [`VEHICLE_DAY_INDEX`] becomes `Conflict`; closed
/// connections become `Connection`; everything else is a `Query` error.
pub(crate) fn map_diesel_error(error: DieselError) -> AllocationRepositoryError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => AllocationRepositoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => {
            AllocationRepositoryError::query("database query error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            map_unique_violation(info.message(), info.constraint_name())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            AllocationRepositoryError::connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => AllocationRepositoryError::query("database error"),
        _ => AllocationRepositoryError::query("database error"),
    }
}

fn map_unique_violation(message: &str, constraint: Option<&str>) -> AllocationRepositoryError {
    let names_slot_index =
        constraint.is_some_and(|name| name == VEHICLE_DAY_INDEX) || message.contains(VEHICLE_DAY_INDEX);
    if names_slot_index {
        AllocationRepositoryError::conflict("vehicle already allocated for this day")
    } else {
        AllocationRepositoryError::query("unique constraint violated")
    }
}
