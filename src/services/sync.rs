//! Attendance auto-sync
//!
//! Lazy backfill that keeps the trailing attendance window complete: every
//! subscribed meal slot of every service day gets exactly one record, with
//! `AutoSubscribed` standing in where the student took no explicit action.
//! Planning is a pure function of an explicit reference date; the service
//! below feeds it from the store and writes the plan back.

use chrono::{Duration, NaiveDate};
use std::collections::HashSet;
use uuid::Uuid;

use crate::{
    config::MealServiceConfig,
    error::AppResult,
    models::attendance::{AttendanceRecord, NewAttendanceRecord},
    models::enums::MealType,
    models::student::Student,
    repository::Repository,
};

/// First day of the trailing window ending at `today`
pub fn window_start(today: NaiveDate, service: &MealServiceConfig) -> NaiveDate {
    today - Duration::days(service.sync_window_days.saturating_sub(1) as i64)
}

/// Compute the backfill for one student over the trailing window.
///
/// A slot is skipped when the day is the configured non-service weekday, or
/// when any record for (student, meal) already exists on that calendar day,
/// whatever its status, so an explicit excuse or an annulled entry is never
/// overridden by an assumed charge. Running the plan against its own output
/// yields nothing, which is what makes the pass idempotent.
///
/// `existing` may contain records of other students (the day board fetches
/// one shared window); they are ignored here.
pub fn plan_backfill(
    student_id: Uuid,
    meal_plan: &[MealType],
    existing: &[AttendanceRecord],
    today: NaiveDate,
    service: &MealServiceConfig,
) -> Vec<NewAttendanceRecord> {
    let covered: HashSet<(NaiveDate, i16)> = existing
        .iter()
        .filter(|r| r.student_id == student_id)
        .map(|r| (r.service_day(), r.meal_type))
        .collect();

    let mut plan = Vec::new();
    for offset in 0..service.sync_window_days {
        let day = today - Duration::days(offset as i64);
        if !service.is_service_day(day) {
            continue;
        }
        for meal in meal_plan {
            if covered.contains(&(day, meal.code())) {
                continue;
            }
            plan.push(NewAttendanceRecord::auto_subscribed(student_id, *meal, day));
        }
    }
    plan
}

#[derive(Clone)]
pub struct SyncService {
    repository: Repository,
    service: MealServiceConfig,
}

impl SyncService {
    pub fn new(repository: Repository, service: MealServiceConfig) -> Self {
        Self { repository, service }
    }

    /// Backfill one student and return the complete window record set
    /// (pre-existing rows plus whatever the store accepted), so the caller
    /// can render the synced view without a second read.
    pub async fn sync_student(
        &self,
        student: &Student,
        today: NaiveDate,
    ) -> AppResult<Vec<AttendanceRecord>> {
        let since = window_start(today, &self.service);
        let existing = self
            .repository
            .attendance
            .list_window(&[student.id], since)
            .await?;

        let plan = plan_backfill(student.id, &student.meal_plan(), &existing, today, &self.service);
        let inserted = self.apply(plan).await;

        let mut records = existing;
        records.extend(inserted);
        Ok(records)
    }

    /// Backfill a set of students against one shared window read (the day
    /// board load). Returns the complete window record set.
    pub async fn sync_students(
        &self,
        students: &[Student],
        today: NaiveDate,
    ) -> AppResult<Vec<AttendanceRecord>> {
        if students.is_empty() {
            return Ok(Vec::new());
        }

        let since = window_start(today, &self.service);
        let ids: Vec<Uuid> = students.iter().map(|s| s.id).collect();
        let existing = self.repository.attendance.list_window(&ids, since).await?;

        let mut plan = Vec::new();
        for student in students {
            plan.extend(plan_backfill(
                student.id,
                &student.meal_plan(),
                &existing,
                today,
                &self.service,
            ));
        }
        let inserted = self.apply(plan).await;

        let mut records = existing;
        records.extend(inserted);
        Ok(records)
    }

    /// Write a plan to the store. Failures are reported and swallowed: the
    /// surrounding view load proceeds with the records that already exist,
    /// and the gap heals on the next pass.
    async fn apply(&self, plan: Vec<NewAttendanceRecord>) -> Vec<AttendanceRecord> {
        if plan.is_empty() {
            return Vec::new();
        }

        match self.repository.attendance.insert_batch(&plan).await {
            Ok(inserted) => {
                if inserted.len() < plan.len() {
                    tracing::debug!(
                        planned = plan.len(),
                        inserted = inserted.len(),
                        "some backfill rows already present, skipped by the store"
                    );
                }
                inserted
            }
            Err(e) => {
                tracing::warn!(error = %e, planned = plan.len(), "attendance backfill failed");
                Vec::new()
            }
        }
    }
}
