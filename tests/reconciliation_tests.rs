//! Attendance auto-sync planning tests

use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::HashSet;
use uuid::Uuid;

use comedor_server::config::MealServiceConfig;
use comedor_server::models::attendance::{AttendanceRecord, NewAttendanceRecord};
use comedor_server::models::enums::{AttendanceStatus, MealType};
use comedor_server::services::billing::daily_total;
use comedor_server::services::sync::{plan_backfill, window_start};

fn service() -> MealServiceConfig {
    // saturday off, 3-day window
    MealServiceConfig::default()
}

/// A Wednesday; the trailing 3-day window contains no Saturday
fn plain_today() -> NaiveDate {
    let d = NaiveDate::from_ymd_opt(2026, 3, 18).unwrap();
    assert_eq!(d.weekday(), Weekday::Wed);
    d
}

/// A Sunday; yesterday in the trailing window is a Saturday
fn today_after_saturday() -> NaiveDate {
    let d = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
    assert_eq!(d.weekday(), Weekday::Sun);
    d
}

/// Materialize a planned insert the way the store would
fn stored(new: &NewAttendanceRecord) -> AttendanceRecord {
    AttendanceRecord {
        id: Uuid::new_v4(),
        student_id: new.student_id,
        meal_type: new.meal_type.code(),
        status: new.status.code(),
        served_at: new.served_at,
        has_extra: new.has_extra,
        extra_notes: new.extra_notes.clone(),
        is_paid: false,
        payment_date: None,
    }
}

fn existing(
    student_id: Uuid,
    meal: MealType,
    status: AttendanceStatus,
    day: NaiveDate,
) -> AttendanceRecord {
    AttendanceRecord {
        id: Uuid::new_v4(),
        student_id,
        meal_type: meal.code(),
        status: status.code(),
        served_at: day.and_hms_opt(13, 15, 0).unwrap().and_utc(),
        has_extra: false,
        extra_notes: None,
        is_paid: false,
        payment_date: None,
    }
}

#[test]
fn fills_every_missing_slot_in_the_window() {
    let student = Uuid::new_v4();
    let plan = plan_backfill(
        student,
        &[MealType::Breakfast, MealType::Lunch],
        &[],
        plain_today(),
        &service(),
    );

    // 2 meals x 3 service days
    assert_eq!(plan.len(), 6);
    assert!(plan.iter().all(|r| r.status == AttendanceStatus::AutoSubscribed));
    assert!(plan.iter().all(|r| r.student_id == student));

    let slots: HashSet<(NaiveDate, i16)> = plan
        .iter()
        .map(|r| (r.served_at.date_naive(), r.meal_type.code()))
        .collect();
    assert_eq!(slots.len(), 6, "one insert per (day, meal) slot");

    let start = window_start(plain_today(), &service());
    assert_eq!(start, NaiveDate::from_ymd_opt(2026, 3, 16).unwrap());
    assert!(plan
        .iter()
        .all(|r| r.served_at.date_naive() >= start && r.served_at.date_naive() <= plain_today()));
}

#[test]
fn never_creates_records_on_the_non_service_day() {
    let student = Uuid::new_v4();
    let today = today_after_saturday();
    let plan = plan_backfill(student, &MealType::ALL, &[], today, &service());

    let saturday = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
    assert!(plan.iter().all(|r| r.served_at.date_naive() != saturday));
    // 3 meals x 2 remaining service days
    assert_eq!(plan.len(), 6);
}

#[test]
fn second_pass_is_a_no_op() {
    let student = Uuid::new_v4();
    let today = plain_today();
    let first = plan_backfill(student, &MealType::ALL, &[], today, &service());
    assert_eq!(first.len(), 9);

    let records: Vec<AttendanceRecord> = first.iter().map(stored).collect();
    let second = plan_backfill(student, &MealType::ALL, &records, today, &service());
    assert!(second.is_empty(), "backfill must be idempotent");
}

#[test]
fn existing_records_are_never_overwritten() {
    let student = Uuid::new_v4();
    let today = plain_today();
    let yesterday = today.pred_opt().unwrap();

    // An explicit excuse and an annulled entry both count as handled;
    // neither may be replaced by an assumed charge
    let held = vec![
        existing(student, MealType::Lunch, AttendanceStatus::Excused, yesterday),
        existing(student, MealType::Dinner, AttendanceStatus::Annulled, today),
    ];

    let plan = plan_backfill(student, &MealType::ALL, &held, today, &service());
    assert!(!plan
        .iter()
        .any(|r| r.meal_type == MealType::Lunch && r.served_at.date_naive() == yesterday));
    assert!(!plan
        .iter()
        .any(|r| r.meal_type == MealType::Dinner && r.served_at.date_naive() == today));
    // 9 slots minus the two already handled
    assert_eq!(plan.len(), 7);
}

#[test]
fn unsubscribed_meals_are_not_synthesized() {
    let student = Uuid::new_v4();
    let plan = plan_backfill(student, &[MealType::Dinner], &[], plain_today(), &service());
    assert_eq!(plan.len(), 3);
    assert!(plan.iter().all(|r| r.meal_type == MealType::Dinner));

    let none = plan_backfill(student, &[], &[], plain_today(), &service());
    assert!(none.is_empty());
}

#[test]
fn other_students_records_do_not_cover_the_gap() {
    // The day board feeds one shared window read to every student's plan
    let student = Uuid::new_v4();
    let roommate = Uuid::new_v4();
    let today = plain_today();

    let shared = vec![existing(
        roommate,
        MealType::Lunch,
        AttendanceStatus::Verified,
        today,
    )];

    let plan = plan_backfill(student, &[MealType::Lunch], &shared, today, &service());
    assert_eq!(plan.len(), 3, "a roommate's lunch covers nothing");
}

#[test]
fn window_spanning_the_skip_day_with_partial_records() {
    // Subscribed to all three meals; yesterday is the non-service Saturday;
    // the day before already has a verified lunch
    let student = Uuid::new_v4();
    let today = today_after_saturday();
    let friday = NaiveDate::from_ymd_opt(2026, 3, 13).unwrap();

    let held = vec![existing(student, MealType::Lunch, AttendanceStatus::Verified, friday)];
    let plan = plan_backfill(student, &MealType::ALL, &held, today, &service());

    // 3 for today + 0 for Saturday + 2 for Friday (breakfast, dinner)
    assert_eq!(plan.len(), 5);
    let friday_meals: HashSet<i16> = plan
        .iter()
        .filter(|r| r.served_at.date_naive() == friday)
        .map(|r| r.meal_type.code())
        .collect();
    assert_eq!(
        friday_meals,
        HashSet::from([MealType::Breakfast.code(), MealType::Dinner.code()])
    );
}

#[test]
fn concurrent_passes_converge_with_store_side_uniqueness() {
    // Two terminals plan against the same snapshot; a store that enforces
    // the (student, meal, day) constraint keeps exactly one row per slot
    let student = Uuid::new_v4();
    let today = plain_today();

    let pass_a = plan_backfill(student, &MealType::ALL, &[], today, &service());
    let pass_b = plan_backfill(student, &MealType::ALL, &[], today, &service());
    assert_eq!(pass_a.len(), pass_b.len());

    let mut store: Vec<AttendanceRecord> = Vec::new();
    let mut taken: HashSet<(Uuid, i16, NaiveDate)> = HashSet::new();
    for new in pass_a.iter().chain(pass_b.iter()) {
        let key = (new.student_id, new.meal_type.code(), new.served_at.date_naive());
        // ON CONFLICT DO NOTHING
        if taken.insert(key) {
            store.push(stored(new));
        }
    }

    assert_eq!(store.len(), 9);
    let follow_up = plan_backfill(student, &MealType::ALL, &store, today, &service());
    assert!(follow_up.is_empty());
}

#[test]
fn duplicate_rows_without_uniqueness_never_double_charge() {
    // Without store-side uniqueness the race can land duplicate rows; the
    // pricing engine still charges each slot once
    let student = Uuid::new_v4();
    let today = plain_today();

    let pass_a = plan_backfill(student, &MealType::ALL, &[], today, &service());
    let pass_b = plan_backfill(student, &MealType::ALL, &[], today, &service());

    let store: Vec<AttendanceRecord> =
        pass_a.iter().chain(pass_b.iter()).map(stored).collect();
    assert_eq!(store.len(), 18);

    let todays: Vec<AttendanceRecord> = store
        .iter()
        .filter(|r| r.service_day() == today)
        .cloned()
        .collect();
    assert_eq!(todays.len(), 6);
    // Full board price, charged once
    assert_eq!(daily_total(&todays), rust_decimal::Decimal::new(19_00, 2));
}

#[test]
fn plan_is_not_clipped_to_enrollment_date() {
    // A student enrolled today is still backfilled from the start of the
    // window; the window is anchored to "now", not to the joined date
    let student = Uuid::new_v4();
    let today = plain_today();
    let plan = plan_backfill(student, &[MealType::Lunch], &[], today, &service());

    let start = window_start(today, &service());
    assert!(plan.iter().any(|r| r.served_at.date_naive() == start));
}

#[test]
fn configured_weekday_drives_the_skip() {
    let student = Uuid::new_v4();
    let mut cfg = service();
    cfg.non_service_weekday = "sunday".to_string();

    let sunday = today_after_saturday();
    // With Sunday as the off day, today itself is skipped and the Saturday
    // in the window is a regular service day
    let plan = plan_backfill(student, &[MealType::Breakfast], &[], sunday, &cfg);
    let days: HashSet<NaiveDate> = plan.iter().map(|r| r.served_at.date_naive()).collect();

    assert!(!days.contains(&sunday));
    assert!(days.contains(&NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()));
    assert_eq!(plan.len(), 2);
}
