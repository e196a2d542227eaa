//! Daily pricing engine and billing service
//!
//! The price of a day is a function of which meal slots were consumed
//! (or assumed consumed), evaluated against a discounted bundle table.
//! Everything in the top half of this module is pure; the service at the
//! bottom wires it to the store.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::attendance::AttendanceRecord,
    models::enums::MealType,
    models::extra::ExtraCharge,
    repository::Repository,
};

fn soles(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Bundle price for one day, by meal presence:
///
/// | Combination                  | Price (S/) |
/// |------------------------------|------------|
/// | Breakfast + Lunch + Dinner   | 19.00      |
/// | Breakfast + Lunch            | 14.50      |
/// | Lunch + Dinner               | 14.50      |
/// | Breakfast + Dinner           | 12.00      |
/// | Lunch only                   | 10.00      |
/// | Breakfast only               | 6.00       |
/// | Dinner only                  | 6.00       |
/// | none                         | 0.00       |
pub fn price_for(breakfast: bool, lunch: bool, dinner: bool) -> Decimal {
    match (breakfast, lunch, dinner) {
        (true, true, true) => soles(19_00),
        (true, true, false) => soles(14_50),
        (false, true, true) => soles(14_50),
        (true, false, true) => soles(12_00),
        (false, true, false) => soles(10_00),
        (true, false, false) => soles(6_00),
        (false, false, true) => soles(6_00),
        (false, false, false) => Decimal::ZERO,
    }
}

/// Price all records of one student for one calendar day.
///
/// Only `Verified` and `AutoSubscribed` records count. Duplicate records of
/// a meal type collapse into the same presence flag, so a duplicate insert
/// that slipped past the store can never double-charge. Records whose stored
/// meal-type code is unknown contribute nothing.
pub fn daily_total(records: &[AttendanceRecord]) -> Decimal {
    let mut breakfast = false;
    let mut lunch = false;
    let mut dinner = false;

    for record in records {
        if !record.is_chargeable() {
            continue;
        }
        match record.meal() {
            Some(MealType::Breakfast) => breakfast = true,
            Some(MealType::Lunch) => lunch = true,
            Some(MealType::Dinner) => dinner = true,
            None => {}
        }
    }

    price_for(breakfast, lunch, dinner)
}

/// One priced day in a billing statement
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DayCharge {
    pub day: NaiveDate,
    /// Chargeable meal slots present on that day
    pub meals: Vec<MealType>,
    #[schema(value_type = f64)]
    pub total: Decimal,
}

/// Partition one student's records by calendar day and price each day.
/// Days appear in ascending order; days whose records are all
/// non-chargeable still appear, priced at zero.
pub fn day_charges(records: &[AttendanceRecord]) -> Vec<DayCharge> {
    let mut by_day: BTreeMap<NaiveDate, Vec<AttendanceRecord>> = BTreeMap::new();
    for record in records {
        by_day
            .entry(record.service_day())
            .or_default()
            .push(record.clone());
    }

    by_day
        .into_iter()
        .map(|(day, day_records)| {
            let mut meals: Vec<MealType> = day_records
                .iter()
                .filter(|r| r.is_chargeable())
                .filter_map(|r| r.meal())
                .collect();
            meals.sort_by_key(|m| m.code());
            meals.dedup();

            DayCharge {
                day,
                total: daily_total(&day_records),
                meals,
            }
        })
        .collect()
}

/// Sum of daily totals over an arbitrary set of one student's records
pub fn period_total(records: &[AttendanceRecord]) -> Decimal {
    day_charges(records).iter().map(|d| d.total).sum()
}

/// Sum of daily totals over records that may span several students
/// (dashboard collections aggregate)
pub fn period_total_multi(records: &[AttendanceRecord]) -> Decimal {
    let mut by_student: BTreeMap<Uuid, Vec<AttendanceRecord>> = BTreeMap::new();
    for record in records {
        by_student
            .entry(record.student_id)
            .or_default()
            .push(record.clone());
    }
    by_student.values().map(|rs| period_total(rs)).sum()
}

/// Billing statement for one student over a date range
#[derive(Debug, Serialize, ToSchema)]
pub struct BillingStatement {
    pub student_id: Uuid,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub days: Vec<DayCharge>,
    /// Total of the days above
    #[schema(value_type = f64)]
    pub period_total: Decimal,
    /// Unpaid meal charges over the student's whole history
    #[schema(value_type = f64)]
    pub outstanding_meals: Decimal,
    /// Unpaid extra charges
    #[schema(value_type = f64)]
    pub outstanding_extras: Decimal,
    /// Running debt figure shown to staff
    #[schema(value_type = f64)]
    pub outstanding_total: Decimal,
    pub unpaid_extras: Vec<ExtraCharge>,
}

/// Result of settling a student's account through a date
#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentReceipt {
    pub student_id: Uuid,
    pub through: NaiveDate,
    pub settled_records: u64,
    pub settled_extras: u64,
    /// Amount that was outstanding for the settled range
    #[schema(value_type = f64)]
    pub amount: Decimal,
    pub paid_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct BillingService {
    repository: Repository,
}

impl BillingService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Priced per-day breakdown for a date range plus the student's
    /// outstanding balance.
    pub async fn statement(
        &self,
        student_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> AppResult<BillingStatement> {
        // Verify student exists
        self.repository.students.get_by_id(student_id).await?;

        let records = self
            .repository
            .attendance
            .list_for_student(student_id, from, to, None)
            .await?;
        let days = day_charges(&records);
        let total: Decimal = days.iter().map(|d| d.total).sum();

        let unpaid_records = self.repository.attendance.list_unpaid(student_id).await?;
        let unpaid_extras = self.repository.extras.list_unpaid(student_id).await?;

        let outstanding_meals = period_total(&unpaid_records);
        let outstanding_extras: Decimal = unpaid_extras.iter().map(|e| e.price).sum();

        Ok(BillingStatement {
            student_id,
            from,
            to,
            days,
            period_total: total,
            outstanding_meals,
            outstanding_extras,
            outstanding_total: outstanding_meals + outstanding_extras,
            unpaid_extras,
        })
    }

    /// Settle all unpaid chargeable records and extras up to and including
    /// `through`. The amount is computed before marking so the receipt
    /// reflects what this payment covered.
    pub async fn settle(
        &self,
        student_id: Uuid,
        through: NaiveDate,
        paid_at: DateTime<Utc>,
    ) -> AppResult<PaymentReceipt> {
        self.repository.students.get_by_id(student_id).await?;

        let unpaid_records: Vec<AttendanceRecord> = self
            .repository
            .attendance
            .list_unpaid(student_id)
            .await?
            .into_iter()
            .filter(|r| r.service_day() <= through)
            .collect();
        let unpaid_extras: Decimal = self
            .repository
            .extras
            .list_unpaid(student_id)
            .await?
            .into_iter()
            .filter(|e| e.created_at.date_naive() <= through)
            .map(|e| e.price)
            .sum();

        let amount = period_total(&unpaid_records) + unpaid_extras;

        let settled_records = self
            .repository
            .attendance
            .mark_paid(student_id, through, paid_at)
            .await?;
        let settled_extras = self
            .repository
            .extras
            .mark_paid(student_id, through, paid_at)
            .await?;

        tracing::info!(
            %student_id,
            %through,
            settled_records,
            settled_extras,
            %amount,
            "account settled"
        );

        Ok(PaymentReceipt {
            student_id,
            through,
            settled_records,
            settled_extras,
            amount,
            paid_at,
        })
    }
}
