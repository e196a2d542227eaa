//! Attendance API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::attendance::{
        AttendanceDetails, AttendanceQuery, RegisterAttendance, SetAttendanceStatus,
    },
};

/// Attendance board for one service day
///
/// Unless `sync=false`, loading the board backfills the trailing window for
/// every active student before listing, so subscribed slots with no explicit
/// action show up as auto-subscribed records.
#[utoipa::path(
    get,
    path = "/attendance",
    tag = "attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Records for the day", body = Vec<AttendanceDetails>)
    )
)]
pub async fn day_board(
    State(state): State<crate::AppState>,
    Query(query): Query<AttendanceQuery>,
) -> AppResult<Json<Vec<AttendanceDetails>>> {
    let today = Utc::now().date_naive();
    let day = query.date.unwrap_or(today);

    if query.sync.unwrap_or(true) {
        let students = state.services.students.list_active().await?;
        if let Err(e) = state.services.sync.sync_students(&students, today).await {
            tracing::warn!(error = %e, "attendance sync failed on board load");
        }
    }

    let records = state.services.attendance.day_records(day).await?;
    Ok(Json(records.into_iter().map(AttendanceDetails::from).collect()))
}

/// Register a meal action (kiosk / staff terminal)
#[utoipa::path(
    post,
    path = "/attendance",
    tag = "attendance",
    request_body = RegisterAttendance,
    responses(
        (status = 201, description = "Attendance registered", body = AttendanceDetails),
        (status = 409, description = "Meal already registered for this day"),
        (status = 422, description = "Outside service hours or non-service day")
    )
)]
pub async fn register_attendance(
    State(state): State<crate::AppState>,
    Json(data): Json<RegisterAttendance>,
) -> AppResult<(StatusCode, Json<AttendanceDetails>)> {
    let record = state.services.attendance.register(&data, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(record.into())))
}

/// Change a record's status (annul / restore)
#[utoipa::path(
    put,
    path = "/attendance/{id}/status",
    tag = "attendance",
    params(("id" = Uuid, Path, description = "Attendance record ID")),
    request_body = SetAttendanceStatus,
    responses(
        (status = 200, description = "Status changed", body = AttendanceDetails),
        (status = 404, description = "Record not found")
    )
)]
pub async fn set_attendance_status(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<SetAttendanceStatus>,
) -> AppResult<Json<AttendanceDetails>> {
    let record = state.services.attendance.set_status(id, data.status).await?;
    Ok(Json(record.into()))
}

/// Hard-delete an attendance record
#[utoipa::path(
    delete,
    path = "/attendance/{id}",
    tag = "attendance",
    params(("id" = Uuid, Path, description = "Attendance record ID")),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 404, description = "Record not found")
    )
)]
pub async fn delete_attendance(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.attendance.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
