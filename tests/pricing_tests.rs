//! Daily pricing engine tests

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use comedor_server::models::attendance::AttendanceRecord;
use comedor_server::models::enums::{AttendanceStatus, MealType};
use comedor_server::services::billing::{daily_total, day_charges, period_total, price_for};

fn soles(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

fn record_on(
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
        served_at: day.and_hms_opt(12, 0, 0).unwrap().and_utc(),
        has_extra: false,
        extra_notes: None,
        is_paid: false,
        payment_date: None,
    }
}

fn record(meal: MealType, status: AttendanceStatus) -> AttendanceRecord {
    let day = NaiveDate::from_ymd_opt(2026, 3, 18).unwrap();
    record_on(Uuid::nil(), meal, status, day)
}

#[test]
fn price_table_is_exhaustive() {
    // All 8 presence combinations, most-bundled first
    assert_eq!(price_for(true, true, true), soles(19_00));
    assert_eq!(price_for(true, true, false), soles(14_50));
    assert_eq!(price_for(false, true, true), soles(14_50));
    assert_eq!(price_for(true, false, true), soles(12_00));
    assert_eq!(price_for(false, true, false), soles(10_00));
    assert_eq!(price_for(true, false, false), soles(6_00));
    assert_eq!(price_for(false, false, true), soles(6_00));
    assert_eq!(price_for(false, false, false), Decimal::ZERO);
}

#[test]
fn verified_breakfast_and_lunch_get_bundle_price() {
    let records = vec![
        record(MealType::Breakfast, AttendanceStatus::Verified),
        record(MealType::Lunch, AttendanceStatus::Verified),
    ];
    assert_eq!(daily_total(&records), soles(14_50));
}

#[test]
fn empty_day_costs_nothing() {
    assert_eq!(daily_total(&[]), Decimal::ZERO);
}

#[test]
fn excused_dinner_is_free() {
    let records = vec![record(MealType::Dinner, AttendanceStatus::Excused)];
    assert_eq!(daily_total(&records), Decimal::ZERO);
}

#[test]
fn annulled_records_are_free() {
    let records = vec![
        record(MealType::Breakfast, AttendanceStatus::Annulled),
        record(MealType::Lunch, AttendanceStatus::Annulled),
        record(MealType::Dinner, AttendanceStatus::Annulled),
    ];
    assert_eq!(daily_total(&records), Decimal::ZERO);
}

#[test]
fn auto_subscribed_charges_like_verified() {
    // Chargeability depends only on the status class, not on whether the
    // student confirmed or the sync pass assumed presence
    for meals in [
        vec![MealType::Lunch],
        vec![MealType::Breakfast, MealType::Lunch],
        vec![MealType::Breakfast, MealType::Lunch, MealType::Dinner],
    ] {
        let verified: Vec<_> = meals
            .iter()
            .map(|m| record(*m, AttendanceStatus::Verified))
            .collect();
        let assumed: Vec<_> = meals
            .iter()
            .map(|m| record(*m, AttendanceStatus::AutoSubscribed))
            .collect();
        assert_eq!(daily_total(&verified), daily_total(&assumed));
    }
}

#[test]
fn mixed_status_classes_combine() {
    let records = vec![
        record(MealType::Breakfast, AttendanceStatus::Verified),
        record(MealType::Lunch, AttendanceStatus::AutoSubscribed),
        record(MealType::Dinner, AttendanceStatus::Excused),
    ];
    // Breakfast + Lunch bundle; the excused dinner contributes nothing
    assert_eq!(daily_total(&records), soles(14_50));
}

#[test]
fn duplicate_records_never_double_charge() {
    let one = vec![record(MealType::Lunch, AttendanceStatus::Verified)];
    let two = vec![
        record(MealType::Lunch, AttendanceStatus::Verified),
        record(MealType::Lunch, AttendanceStatus::Verified),
    ];
    assert_eq!(daily_total(&one), daily_total(&two));
    assert_eq!(daily_total(&two), soles(10_00));
}

#[test]
fn unknown_meal_type_code_is_ignored() {
    let mut stray = record(MealType::Lunch, AttendanceStatus::Verified);
    stray.meal_type = 99;

    let records = vec![stray, record(MealType::Breakfast, AttendanceStatus::Verified)];
    // The stray row prices as if absent: breakfast only
    assert_eq!(daily_total(&records), soles(6_00));
}

#[test]
fn unknown_status_code_is_not_chargeable() {
    let mut stray = record(MealType::Lunch, AttendanceStatus::Verified);
    stray.status = 42;
    assert_eq!(daily_total(&[stray]), Decimal::ZERO);
}

#[test]
fn period_total_partitions_by_calendar_day() {
    let student = Uuid::new_v4();
    let monday = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
    let tuesday = NaiveDate::from_ymd_opt(2026, 3, 17).unwrap();

    let records = vec![
        record_on(student, MealType::Breakfast, AttendanceStatus::Verified, monday),
        record_on(student, MealType::Lunch, AttendanceStatus::Verified, monday),
        record_on(student, MealType::Lunch, AttendanceStatus::AutoSubscribed, tuesday),
    ];

    // 14.50 (Mon bundle) + 10.00 (Tue lunch only)
    assert_eq!(period_total(&records), soles(24_50));

    let days = day_charges(&records);
    assert_eq!(days.len(), 2);
    assert_eq!(days[0].day, monday);
    assert_eq!(days[0].total, soles(14_50));
    assert_eq!(days[1].day, tuesday);
    assert_eq!(days[1].total, soles(10_00));
}

#[test]
fn day_grouping_uses_local_calendar_date() {
    let student = Uuid::new_v4();
    // 23:30 and 00:30 the next day are different service days even though
    // they are one hour apart
    let late = Utc.with_ymd_and_hms(2026, 3, 16, 23, 30, 0).unwrap();
    let early = Utc.with_ymd_and_hms(2026, 3, 17, 0, 30, 0).unwrap();

    let mut a = record_on(
        student,
        MealType::Dinner,
        AttendanceStatus::Verified,
        late.date_naive(),
    );
    a.served_at = late;
    let mut b = record_on(
        student,
        MealType::Lunch,
        AttendanceStatus::Verified,
        early.date_naive(),
    );
    b.served_at = early;

    // Dinner-only day plus lunch-only day (6.00 + 10.00), not a same-day
    // lunch+dinner bundle (14.50)
    assert_eq!(period_total(&[a, b]), soles(16_00));
    assert_eq!(day_charges(&[]).len(), 0);
}
