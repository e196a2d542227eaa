//! Attendance record (meal log) model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::enums::{AttendanceStatus, MealType};

/// Attendance record from database.
///
/// Meal type and status are kept as stored smallint codes; accessors decode
/// them so rows with codes from no known class degrade to "absent" instead
/// of failing the fetch.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub student_id: Uuid,
    pub meal_type: i16,
    pub status: i16,
    /// When the meal was recorded; its local calendar date is the grouping
    /// key for pricing and for the one-record-per-day invariant.
    pub served_at: DateTime<Utc>,
    pub has_extra: bool,
    pub extra_notes: Option<String>,
    pub is_paid: bool,
    pub payment_date: Option<DateTime<Utc>>,
}

impl AttendanceRecord {
    pub fn meal(&self) -> Option<MealType> {
        MealType::from_code(self.meal_type)
    }

    pub fn attendance_status(&self) -> Option<AttendanceStatus> {
        AttendanceStatus::from_code(self.status)
    }

    /// Whether this record counts toward the daily charge.
    pub fn is_chargeable(&self) -> bool {
        self.attendance_status()
            .map(AttendanceStatus::is_chargeable)
            .unwrap_or(false)
    }

    /// Calendar day this record belongs to.
    pub fn service_day(&self) -> NaiveDate {
        self.served_at.date_naive()
    }
}

/// Insertion request produced by the attendance sync pass or by explicit
/// registration, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttendanceRecord {
    pub student_id: Uuid,
    pub meal_type: MealType,
    pub status: AttendanceStatus,
    pub served_at: DateTime<Utc>,
    pub has_extra: bool,
    pub extra_notes: Option<String>,
}

impl NewAttendanceRecord {
    /// Backfill record for a subscribed meal slot that got no explicit action.
    pub fn auto_subscribed(student_id: Uuid, meal_type: MealType, day: NaiveDate) -> Self {
        Self {
            student_id,
            meal_type,
            status: AttendanceStatus::AutoSubscribed,
            served_at: day.and_hms_opt(0, 0, 0).expect("midnight is valid").and_utc(),
            has_extra: false,
            extra_notes: None,
        }
    }
}

/// Explicit registration request from a kiosk or staff terminal
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterAttendance {
    pub student_id: Uuid,
    /// When omitted, resolved from the configured meal schedule and the
    /// current time of day.
    pub meal_type: Option<MealType>,
    /// Only `verified` and `excused` are accepted here; the other statuses
    /// are reserved for the sync pass and for administrative voiding.
    pub status: AttendanceStatus,
    #[serde(default)]
    pub has_extra: bool,
    pub extra_notes: Option<String>,
}

/// Status change request (annul / restore)
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetAttendanceStatus {
    pub status: AttendanceStatus,
}

/// Query parameters for the per-day attendance board
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct AttendanceQuery {
    /// Service day (YYYY-MM-DD), defaults to today
    pub date: Option<NaiveDate>,
    /// When true (default), backfill missing subscribed slots before listing
    pub sync: Option<bool>,
}

/// Query parameters for a student's attendance history
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct HistoryQuery {
    /// Start of the date range (inclusive)
    pub from: Option<NaiveDate>,
    /// End of the date range (inclusive)
    pub to: Option<NaiveDate>,
    /// Restrict to one meal type
    pub meal_type: Option<MealType>,
}

/// Attendance record with decoded enums and display labels
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AttendanceDetails {
    pub id: Uuid,
    pub student_id: Uuid,
    pub meal_type: Option<MealType>,
    pub meal_label: Option<String>,
    pub status: Option<AttendanceStatus>,
    pub status_label: Option<String>,
    pub served_at: DateTime<Utc>,
    pub service_day: NaiveDate,
    pub chargeable: bool,
    pub has_extra: bool,
    pub extra_notes: Option<String>,
    pub is_paid: bool,
    pub payment_date: Option<DateTime<Utc>>,
}

impl From<AttendanceRecord> for AttendanceDetails {
    fn from(r: AttendanceRecord) -> Self {
        let meal = r.meal();
        let status = r.attendance_status();
        Self {
            service_day: r.service_day(),
            chargeable: r.is_chargeable(),
            meal_type: meal,
            meal_label: meal.map(|m| m.label().to_string()),
            status,
            status_label: status.map(|s| s.label().to_string()),
            id: r.id,
            student_id: r.student_id,
            served_at: r.served_at,
            has_extra: r.has_extra,
            extra_notes: r.extra_notes,
            is_paid: r.is_paid,
            payment_date: r.payment_date,
        }
    }
}
