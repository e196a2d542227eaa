//! Attendance registration and audit service

use chrono::{DateTime, NaiveDate, Timelike, Utc};
use uuid::Uuid;

use crate::{
    config::MealServiceConfig,
    error::{AppError, AppResult},
    models::attendance::{
        AttendanceRecord, HistoryQuery, NewAttendanceRecord, RegisterAttendance,
    },
    models::enums::{AttendanceStatus, MealType},
    repository::Repository,
};

#[derive(Clone)]
pub struct AttendanceService {
    repository: Repository,
    service: MealServiceConfig,
}

impl AttendanceService {
    pub fn new(repository: Repository, service: MealServiceConfig) -> Self {
        Self { repository, service }
    }

    /// Register an explicit action from a kiosk or staff terminal:
    /// consumption (`Verified`) or advance notice of absence (`Excused`).
    ///
    /// When no meal type is supplied, the slot open at the current hour is
    /// used. Registration is refused on the extras-only weekday and for
    /// deactivated students.
    pub async fn register(
        &self,
        data: &RegisterAttendance,
        now: DateTime<Utc>,
    ) -> AppResult<AttendanceRecord> {
        let student = self.repository.students.get_by_id(data.student_id).await?;
        if !student.active {
            return Err(AppError::BusinessRule(format!(
                "Student {} is not active",
                student.full_name()
            )));
        }

        if !self.service.is_service_day(now.date_naive()) {
            return Err(AppError::BusinessRule(
                "No regular meal service today, only extras can be registered".to_string(),
            ));
        }

        if !matches!(
            data.status,
            AttendanceStatus::Verified | AttendanceStatus::Excused
        ) {
            return Err(AppError::BadRequest(
                "Only verified and excused can be registered directly".to_string(),
            ));
        }

        let meal = match data.meal_type {
            Some(m) => m,
            None => self.service.active_meal(now.hour()).ok_or_else(|| {
                AppError::BusinessRule("No meal service at this hour".to_string())
            })?,
        };

        if data.has_extra && meal != MealType::Lunch {
            return Err(AppError::BadRequest(
                "The extras marker only applies to lunch".to_string(),
            ));
        }

        let record = self
            .repository
            .attendance
            .insert(&NewAttendanceRecord {
                student_id: student.id,
                meal_type: meal,
                status: data.status,
                served_at: now,
                has_extra: data.has_extra,
                extra_notes: data.extra_notes.clone(),
            })
            .await?;

        tracing::debug!(
            student = %student.full_name(),
            meal = %meal,
            status = %data.status,
            "attendance registered"
        );
        Ok(record)
    }

    /// Audit history for one student, newest first, with optional date range
    /// and meal filters.
    pub async fn history(
        &self,
        student_id: Uuid,
        query: &HistoryQuery,
    ) -> AppResult<Vec<AttendanceRecord>> {
        self.repository.students.get_by_id(student_id).await?;
        self.repository
            .attendance
            .list_for_student(
                student_id,
                query.from,
                query.to,
                query.meal_type.map(|m| m.code()),
            )
            .await
    }

    /// All records for one service day
    pub async fn day_records(&self, day: NaiveDate) -> AppResult<Vec<AttendanceRecord>> {
        self.repository.attendance.list_for_day(day).await
    }

    /// Change a record's status (annul, restore, correct). The target must
    /// be one of the closed status set; transitions are otherwise free, so
    /// staff can undo a void and put back the class the record had before.
    pub async fn set_status(
        &self,
        id: Uuid,
        status: AttendanceStatus,
    ) -> AppResult<AttendanceRecord> {
        self.repository.attendance.set_status(id, status.code()).await
    }

    /// Hard-delete a record
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.attendance.delete(id).await
    }
}
