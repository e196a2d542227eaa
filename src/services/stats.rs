//! Statistics service (dashboard figures)

use chrono::{Datelike, Duration, NaiveDate};

use crate::{
    api::stats::{DashboardStats, MealCount},
    error::AppResult,
    models::enums::MealType,
    repository::Repository,
    services::billing,
};

/// First and last day of the month containing `day`
fn month_bounds(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = NaiveDate::from_ymd_opt(day.year(), day.month(), 1)
        .expect("first of month is valid");
    let next_month = if day.month() == 12 {
        NaiveDate::from_ymd_opt(day.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(day.year(), day.month() + 1, 1)
    }
    .expect("first of next month is valid");
    (first, next_month - Duration::days(1))
}

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Dashboard figures for one reference day: active students, today's
    /// verified consumption per meal, and the amount collected so far this
    /// month (settled meal charges priced by the bundle table, plus settled
    /// extras).
    pub async fn dashboard(&self, today: NaiveDate) -> AppResult<DashboardStats> {
        let active_students = self.repository.students.count_active().await?;

        let counts = self.repository.attendance.count_verified_by_meal(today).await?;
        let meals_today = MealType::ALL
            .iter()
            .map(|meal| MealCount {
                meal_type: *meal,
                label: meal.label().to_string(),
                verified: counts
                    .iter()
                    .find(|(code, _)| *code == meal.code())
                    .map(|(_, n)| *n)
                    .unwrap_or(0),
            })
            .collect();

        let (month_start, month_end) = month_bounds(today);
        let from = month_start
            .and_hms_opt(0, 0, 0)
            .expect("midnight is valid")
            .and_utc();
        let to = month_end
            .and_hms_opt(23, 59, 59)
            .expect("end of day is valid")
            .and_utc();

        let paid_records = self.repository.attendance.list_paid_between(from, to).await?;
        let collected_meals = billing::period_total_multi(&paid_records);
        let collected_extras = self.repository.extras.sum_paid_between(from, to).await?;

        Ok(DashboardStats {
            date: today,
            active_students,
            meals_today,
            collected_meals,
            collected_extras,
            collected_total: collected_meals + collected_extras,
        })
    }
}
