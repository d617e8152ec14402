//! Tests for allocation value types and scheduling rules.

use chrono::{Duration, TimeZone};
use rstest::{fixture, rstest};

use super::*;

fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

#[fixture]
fn stored() -> Allocation {
    let created_at = at(2025, 6, 1, 9);
    Allocation::new(AllocationDraft {
        id: AllocationId::random(),
        employee_id: EmployeeId::new(7).expect("valid employee"),
        vehicle_id: VehicleId::new(12).expect("valid vehicle"),
        allocation_date: at(2025, 6, 10, 14),
        purpose: Purpose::new("site visit").expect("valid purpose"),
        status: AllocationStatus::Pending,
        created_at,
        updated_at: created_at,
    })
    .expect("valid allocation")
}

#[rstest]
#[case(1, true)]
#[case(1000, true)]
#[case(0, false)]
#[case(1001, false)]
#[case(-5, false)]
#[case(70_000, false)]
fn identifiers_are_range_checked(#[case] value: i64, #[case] accepted: bool) {
    assert_eq!(EmployeeId::new(value).is_ok(), accepted);
    assert_eq!(VehicleId::new(value).is_ok(), accepted);
}

#[rstest]
fn out_of_range_vehicle_reports_field() {
    let err = VehicleId::new(0).expect_err("zero is rejected");
    assert_eq!(err, AllocationValidationError::VehicleIdOutOfRange { value: 0 });
    assert!(err.to_string().starts_with("vehicle_id"));
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("\n\t")]
fn blank_purpose_is_rejected(#[case] value: &str) {
    assert_eq!(Purpose::new(value), Err(AllocationValidationError::EmptyPurpose));
}

#[rstest]
#[case("pending", AllocationStatus::Pending)]
#[case("Active", AllocationStatus::Active)]
#[case(" COMPLETED ", AllocationStatus::Completed)]
#[case("cancelled", AllocationStatus::Cancelled)]
fn status_parses_case_insensitively(#[case] raw: &str, #[case] expected: AllocationStatus) {
    assert_eq!(raw.parse::<AllocationStatus>(), Ok(expected));
    assert_eq!(expected.to_string(), expected.as_str());
}

#[rstest]
fn unknown_status_is_rejected() {
    let err = "archived"
        .parse::<AllocationStatus>()
        .expect_err("unknown status");
    assert!(matches!(err, AllocationValidationError::UnknownStatus { .. }));
}

#[rstest]
fn default_status_is_pending() {
    assert_eq!(AllocationStatus::default(), AllocationStatus::Pending);
}

#[rstest]
fn only_cancelled_releases_the_slot() {
    let occupying: Vec<_> = AllocationStatus::ALL
        .into_iter()
        .filter(|status| status.occupies_slot())
        .collect();
    assert_eq!(
        occupying,
        vec![
            AllocationStatus::Pending,
            AllocationStatus::Active,
            AllocationStatus::Completed
        ]
    );
}

#[rstest]
fn every_transition_is_currently_permitted() {
    for from in AllocationStatus::ALL {
        for to in AllocationStatus::ALL {
            assert!(from.permits_transition_to(to), "{from} -> {to}");
        }
    }
}

#[rstest]
#[case(at(2025, 6, 2, 0), true)]
#[case(at(2025, 6, 1, 23), false)]
#[case(at(2025, 6, 1, 0), false)]
#[case(at(2025, 5, 31, 12), false)]
fn future_check_compares_calendar_days(#[case] date: DateTime<Utc>, #[case] expected: bool) {
    let now = at(2025, 6, 1, 12);
    assert_eq!(is_strictly_future(date, now), expected);
}

#[rstest]
fn allocation_rejects_updated_before_created() {
    let created_at = at(2025, 6, 1, 9);
    let result = Allocation::new(AllocationDraft {
        id: AllocationId::random(),
        employee_id: EmployeeId::new(1).expect("valid employee"),
        vehicle_id: VehicleId::new(1).expect("valid vehicle"),
        allocation_date: at(2025, 6, 3, 9),
        purpose: Purpose::new("delivery").expect("valid purpose"),
        status: AllocationStatus::Pending,
        created_at,
        updated_at: created_at - Duration::seconds(1),
    });
    assert_eq!(result, Err(AllocationValidationError::UpdatedBeforeCreated));
}

#[rstest]
fn with_changes_keeps_absent_fields(stored: Allocation) {
    let updated_at = at(2025, 6, 2, 8);
    let changed = stored.clone().with_changes(&AllocationChanges {
        purpose: None,
        status: Some(AllocationStatus::Active),
        updated_at,
    });

    assert_eq!(changed.status(), AllocationStatus::Active);
    assert_eq!(changed.purpose(), stored.purpose());
    assert_eq!(changed.employee_id(), stored.employee_id());
    assert_eq!(changed.vehicle_id(), stored.vehicle_id());
    assert_eq!(changed.allocation_date(), stored.allocation_date());
    assert_eq!(changed.created_at(), stored.created_at());
    assert_eq!(changed.updated_at(), updated_at);
}

#[rstest]
fn occupies_matches_vehicle_day_and_status(stored: Allocation) {
    let vehicle = stored.vehicle_id();
    let day = stored.allocation_day();
    let other_vehicle = VehicleId::new(13).expect("valid vehicle");

    assert!(stored.occupies(vehicle, day));
    assert!(!stored.occupies(other_vehicle, day));
    assert!(!stored.occupies(vehicle, day.succ_opt().expect("next day")));

    let cancelled = stored.with_changes(&AllocationChanges {
        purpose: None,
        status: Some(AllocationStatus::Cancelled),
        updated_at: at(2025, 6, 2, 8),
    });
    assert!(!cancelled.occupies(vehicle, day));
}

#[rstest]
fn modifiable_only_before_the_allocation_day(stored: Allocation) {
    assert!(stored.is_modifiable_at(at(2025, 6, 9, 23)));
    assert!(!stored.is_modifiable_at(at(2025, 6, 10, 0)));
    assert!(!stored.is_modifiable_at(at(2025, 6, 11, 0)));
}

#[rstest]
fn filter_bounds_are_inclusive(stored: Allocation) {
    let exact = AllocationFilter {
        start_date: Some(stored.allocation_date()),
        end_date: Some(stored.allocation_date()),
        ..AllocationFilter::default()
    };
    assert!(exact.matches(&stored));

    let after = AllocationFilter {
        start_date: Some(stored.allocation_date() + Duration::seconds(1)),
        ..AllocationFilter::default()
    };
    assert!(!after.matches(&stored));
}

#[rstest]
fn filter_combines_criteria_conjunctively(stored: Allocation) {
    let matching = AllocationFilter {
        employee_id: Some(stored.employee_id()),
        vehicle_id: Some(stored.vehicle_id()),
        status: Some(AllocationStatus::Pending),
        ..AllocationFilter::default()
    };
    assert!(matching.matches(&stored));

    let wrong_status = AllocationFilter {
        status: Some(AllocationStatus::Active),
        ..matching
    };
    assert!(!wrong_status.matches(&stored));
}

#[rstest]
#[case(None, None, 0, 50)]
#[case(Some(10), Some(1), 10, 1)]
#[case(Some(0), Some(100), 0, 100)]
#[case(Some(5_000_000_000), Some(10), 5_000_000_000, 10)]
#[case(Some(i64::MAX), None, 9_223_372_036_854_775_807, 50)]
fn page_request_accepts_valid_values(
    #[case] skip: Option<i64>,
    #[case] limit: Option<i64>,
    #[case] expected_skip: u64,
    #[case] expected_limit: u8,
) {
    let page = PageRequest::new(skip, limit).expect("valid page");
    assert_eq!(page.skip(), expected_skip);
    assert_eq!(page.limit(), expected_limit);
}

#[rstest]
#[case(Some(-1), None)]
#[case(None, Some(0))]
#[case(None, Some(101))]
#[case(None, Some(-3))]
fn page_request_rejects_out_of_range_values(
    #[case] skip: Option<i64>,
    #[case] limit: Option<i64>,
) {
    assert!(PageRequest::new(skip, limit).is_err());
}

#[rstest]
fn allocation_id_rejects_malformed_input() {
    let err = "not-a-uuid"
        .parse::<AllocationId>()
        .expect_err("malformed id");
    assert!(matches!(err, AllocationValidationError::InvalidId { .. }));
}
