//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. The `diesel
//! print-schema` command regenerates them from a live database.

diesel::table! {
    /// Vehicle allocations.
    ///
    /// `allocation_day` is the UTC calendar day of `allocation_date`; a
    /// partial unique index over `(allocation_day, vehicle_id)` excludes
    /// cancelled rows.
    allocations (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        employee_id -> Int4,
        vehicle_id -> Int4,
        allocation_date -> Timestamptz,
        allocation_day -> Date,
        purpose -> Text,
        /// One of `pending`, `active`, `completed`, `cancelled`.
        status -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
