//! Vehicle allocation aggregate and its value types.
//!
//! An allocation binds one vehicle to one employee for a single UTC calendar
//! day. The time-of-day component of `allocation_date` is kept for display but
//! ignored by every scheduling rule.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Smallest accepted employee or vehicle identifier.
pub const IDENTIFIER_MIN: u16 = 1;
/// Largest accepted employee or vehicle identifier.
pub const IDENTIFIER_MAX: u16 = 1000;

/// Default number of allocations returned by a query page.
pub const DEFAULT_PAGE_LIMIT: u8 = 50;
/// Upper bound for the number of allocations returned by a query page.
pub const MAX_PAGE_LIMIT: u8 = 100;

/// Validation errors raised while constructing allocation values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationValidationError {
    EmployeeIdOutOfRange { value: i64 },
    VehicleIdOutOfRange { value: i64 },
    EmptyPurpose,
    UnknownStatus { value: String },
    InvalidId { value: String },
    UpdatedBeforeCreated,
    SkipOutOfRange { value: i64 },
    LimitOutOfRange { value: i64 },
}

impl fmt::Display for AllocationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmployeeIdOutOfRange { value } => write!(
                f,
                "employee_id must be between {IDENTIFIER_MIN} and {IDENTIFIER_MAX}, got {value}"
            ),
            Self::VehicleIdOutOfRange { value } => write!(
                f,
                "vehicle_id must be between {IDENTIFIER_MIN} and {IDENTIFIER_MAX}, got {value}"
            ),
            Self::EmptyPurpose => write!(f, "purpose must not be empty"),
            Self::UnknownStatus { value } => write!(
                f,
                "status must be one of pending, active, completed, cancelled; got {value}"
            ),
            Self::InvalidId { value } => write!(f, "allocation id {value} is not a valid UUID"),
            Self::UpdatedBeforeCreated => {
                write!(f, "updated_at must not precede created_at")
            }
            Self::SkipOutOfRange { value } => {
                write!(f, "skip must be a non-negative integer, got {value}")
            }
            Self::LimitOutOfRange { value } => {
                write!(f, "limit must be between 1 and {MAX_PAGE_LIMIT}, got {value}")
            }
        }
    }
}

impl std::error::Error for AllocationValidationError {}

/// Store-assigned allocation identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllocationId(Uuid);

impl AllocationId {
    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a fresh random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AllocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for AllocationId {
    type Err = AllocationValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| AllocationValidationError::InvalidId {
                value: s.to_owned(),
            })
    }
}

fn bounded_identifier(value: i64) -> Option<u16> {
    u16::try_from(value)
        .ok()
        .filter(|id| (IDENTIFIER_MIN..=IDENTIFIER_MAX).contains(id))
}

/// Employee identifier, validated by range only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EmployeeId(u16);

impl EmployeeId {
    /// Validate and construct an employee identifier.
    ///
    /// # Examples
    /// ```
    /// use allocations::domain::EmployeeId;
    ///
    /// assert_eq!(EmployeeId::new(42).map(EmployeeId::get), Ok(42));
    /// assert!(EmployeeId::new(1001).is_err());
    /// ```
    pub fn new(value: i64) -> Result<Self, AllocationValidationError> {
        bounded_identifier(value)
            .map(Self)
            .ok_or(AllocationValidationError::EmployeeIdOutOfRange { value })
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Vehicle identifier, validated by range only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct VehicleId(u16);

impl VehicleId {
    /// Validate and construct a vehicle identifier.
    pub fn new(value: i64) -> Result<Self, AllocationValidationError> {
        bounded_identifier(value)
            .map(Self)
            .ok_or(AllocationValidationError::VehicleIdOutOfRange { value })
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Free-text reason for an allocation. Never blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Purpose(String);

impl Purpose {
    /// Validate and construct a purpose.
    pub fn new(value: impl Into<String>) -> Result<Self, AllocationValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AllocationValidationError::EmptyPurpose);
        }
        Ok(Self(value))
    }

    /// Borrow the purpose text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Purpose {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Lifecycle status of an allocation.
///
/// The intended forward path is `pending -> active -> completed`, with
/// `cancelled` reachable from `pending` or `active`. Transitions are not
/// enforced yet; every change goes through
/// [`AllocationStatus::permits_transition_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationStatus {
    #[default]
    Pending,
    Active,
    Completed,
    Cancelled,
}

impl AllocationStatus {
    /// All statuses in declaration order.
    pub const ALL: [Self; 4] = [Self::Pending, Self::Active, Self::Completed, Self::Cancelled];

    /// Stable lowercase representation used on the wire and in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether an allocation in this status holds its vehicle/day slot.
    #[must_use]
    pub const fn occupies_slot(self) -> bool {
        !matches!(self, Self::Cancelled)
    }

    /// Single decision point for status transitions.
    ///
    /// Every transition is currently accepted.
    #[must_use]
    pub const fn permits_transition_to(self, next: Self) -> bool {
        match (self, next) {
            (Self::Pending, _)
            | (Self::Active, _)
            | (Self::Completed, _)
            | (Self::Cancelled, _) => true,
        }
    }
}

impl fmt::Display for AllocationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AllocationStatus {
    type Err = AllocationValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == normalised)
            .ok_or_else(|| AllocationValidationError::UnknownStatus {
                value: s.to_owned(),
            })
    }
}

/// UTC calendar day an allocation occupies.
#[must_use]
pub fn allocation_day(allocation_date: DateTime<Utc>) -> NaiveDate {
    allocation_date.date_naive()
}

/// Whether `allocation_date` falls on a UTC day strictly after `now`'s day.
///
/// # Examples
/// ```
/// use allocations::domain::is_strictly_future;
/// use chrono::{TimeZone, Utc};
///
/// let now = Utc.with_ymd_and_hms(2025, 6, 1, 23, 59, 0).unwrap();
/// let same_day = Utc.with_ymd_and_hms(2025, 6, 1, 23, 59, 59).unwrap();
/// let next_day = Utc.with_ymd_and_hms(2025, 6, 2, 0, 0, 0).unwrap();
/// assert!(!is_strictly_future(same_day, now));
/// assert!(is_strictly_future(next_day, now));
/// ```
#[must_use]
pub fn is_strictly_future(allocation_date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    allocation_day(allocation_date) > now.date_naive()
}

/// Input for reconstructing a persisted [`Allocation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationDraft {
    pub id: AllocationId,
    pub employee_id: EmployeeId,
    pub vehicle_id: VehicleId,
    pub allocation_date: DateTime<Utc>,
    pub purpose: Purpose,
    pub status: AllocationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A vehicle assigned to an employee for one calendar day.
///
/// ## Invariants
/// - `updated_at` never precedes `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    id: AllocationId,
    employee_id: EmployeeId,
    vehicle_id: VehicleId,
    allocation_date: DateTime<Utc>,
    purpose: Purpose,
    status: AllocationStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Allocation {
    /// Validate a draft and build the aggregate.
    pub fn new(draft: AllocationDraft) -> Result<Self, AllocationValidationError> {
        let AllocationDraft {
            id,
            employee_id,
            vehicle_id,
            allocation_date,
            purpose,
            status,
            created_at,
            updated_at,
        } = draft;

        if updated_at < created_at {
            return Err(AllocationValidationError::UpdatedBeforeCreated);
        }

        Ok(Self {
            id,
            employee_id,
            vehicle_id,
            allocation_date,
            purpose,
            status,
            created_at,
            updated_at,
        })
    }

    /// Materialise a pending insert once the store has assigned an id.
    #[must_use]
    pub fn from_new(id: AllocationId, new: NewAllocation) -> Self {
        let NewAllocation {
            employee_id,
            vehicle_id,
            allocation_date,
            purpose,
            status,
            created_at,
        } = new;
        Self {
            id,
            employee_id,
            vehicle_id,
            allocation_date,
            purpose,
            status,
            created_at,
            updated_at: created_at,
        }
    }

    pub fn id(&self) -> AllocationId {
        self.id
    }

    pub fn employee_id(&self) -> EmployeeId {
        self.employee_id
    }

    pub fn vehicle_id(&self) -> VehicleId {
        self.vehicle_id
    }

    pub fn allocation_date(&self) -> DateTime<Utc> {
        self.allocation_date
    }

    /// UTC calendar day this allocation occupies.
    pub fn allocation_day(&self) -> NaiveDate {
        allocation_day(self.allocation_date)
    }

    pub fn purpose(&self) -> &Purpose {
        &self.purpose
    }

    pub fn status(&self) -> AllocationStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether the allocation may still be updated or deleted at `now`.
    pub fn is_modifiable_at(&self, now: DateTime<Utc>) -> bool {
        is_strictly_future(self.allocation_date, now)
    }

    /// Whether this allocation holds the `(vehicle, day)` slot.
    pub fn occupies(&self, vehicle_id: VehicleId, day: NaiveDate) -> bool {
        self.vehicle_id == vehicle_id && self.allocation_day() == day && self.status.occupies_slot()
    }

    /// Apply a partial update, keeping absent fields untouched.
    ///
    /// `updated_at` is clamped so it never precedes `created_at`.
    #[must_use]
    pub fn with_changes(mut self, changes: &AllocationChanges) -> Self {
        if let Some(purpose) = &changes.purpose {
            self.purpose = purpose.clone();
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        self.updated_at = changes.updated_at.max(self.created_at);
        self
    }
}

/// A validated allocation awaiting its store-assigned identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAllocation {
    pub employee_id: EmployeeId,
    pub vehicle_id: VehicleId,
    pub allocation_date: DateTime<Utc>,
    pub purpose: Purpose,
    pub status: AllocationStatus,
    pub created_at: DateTime<Utc>,
}

impl NewAllocation {
    /// UTC calendar day this allocation would occupy.
    pub fn allocation_day(&self) -> NaiveDate {
        allocation_day(self.allocation_date)
    }
}

/// Partial update applied to a stored allocation.
///
/// `None` fields are left untouched; `updated_at` is always written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationChanges {
    pub purpose: Option<Purpose>,
    pub status: Option<AllocationStatus>,
    pub updated_at: DateTime<Utc>,
}

/// Conjunctive filter over stored allocations. Both date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllocationFilter {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub employee_id: Option<EmployeeId>,
    pub vehicle_id: Option<VehicleId>,
    pub status: Option<AllocationStatus>,
}

impl AllocationFilter {
    /// Whether `allocation` satisfies every configured criterion.
    pub fn matches(&self, allocation: &Allocation) -> bool {
        let date = allocation.allocation_date();
        self.start_date.is_none_or(|start| date >= start)
            && self.end_date.is_none_or(|end| date <= end)
            && self
                .employee_id
                .is_none_or(|id| allocation.employee_id() == id)
            && self
                .vehicle_id
                .is_none_or(|id| allocation.vehicle_id() == id)
            && self.status.is_none_or(|status| allocation.status() == status)
    }
}

/// Offset pagination over query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    skip: u64,
    limit: u8,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl PageRequest {
    /// Validate pagination parameters, applying defaults for absent values.
    ///
    /// # Examples
    /// ```
    /// use allocations::domain::PageRequest;
    ///
    /// let page = PageRequest::new(None, None).expect("defaults are valid");
    /// assert_eq!((page.skip(), page.limit()), (0, 50));
    /// assert!(PageRequest::new(Some(0), Some(101)).is_err());
    /// ```
    pub fn new(skip: Option<i64>, limit: Option<i64>) -> Result<Self, AllocationValidationError> {
        let skip = match skip {
            Some(value) => u64::try_from(value)
                .map_err(|_| AllocationValidationError::SkipOutOfRange { value })?,
            None => 0,
        };
        let limit = match limit {
            Some(value) => u8::try_from(value)
                .ok()
                .filter(|limit| (1..=MAX_PAGE_LIMIT).contains(limit))
                .ok_or(AllocationValidationError::LimitOutOfRange { value })?,
            None => DEFAULT_PAGE_LIMIT,
        };
        Ok(Self { skip, limit })
    }

    pub fn skip(&self) -> u64 {
        self.skip
    }

    pub fn limit(&self) -> u8 {
        self.limit
    }
}

#[cfg(test)]
#[path = "allocation_tests.rs"]
mod tests;
