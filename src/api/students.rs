//! Students API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::attendance::{AttendanceDetails, HistoryQuery},
    models::student::{CreateStudent, Student, StudentQuery, UpdateStudent},
};

/// List students
#[utoipa::path(
    get,
    path = "/students",
    tag = "students",
    params(StudentQuery),
    responses(
        (status = 200, description = "Students list", body = Vec<Student>)
    )
)]
pub async fn list_students(
    State(state): State<crate::AppState>,
    Query(query): Query<StudentQuery>,
) -> AppResult<Json<Vec<Student>>> {
    let students = state.services.students.list(&query).await?;
    Ok(Json(students))
}

/// Get a student by ID
#[utoipa::path(
    get,
    path = "/students/{id}",
    tag = "students",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student", body = Student),
        (status = 404, description = "Student not found")
    )
)]
pub async fn get_student(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Student>> {
    let student = state.services.students.get(id).await?;
    Ok(Json(student))
}

/// Create a student
#[utoipa::path(
    post,
    path = "/students",
    tag = "students",
    request_body = CreateStudent,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 409, description = "Enrollment code already exists")
    )
)]
pub async fn create_student(
    State(state): State<crate::AppState>,
    Json(data): Json<CreateStudent>,
) -> AppResult<(StatusCode, Json<Student>)> {
    let student = state.services.students.create(&data).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

/// Update a student
#[utoipa::path(
    put,
    path = "/students/{id}",
    tag = "students",
    params(("id" = Uuid, Path, description = "Student ID")),
    request_body = UpdateStudent,
    responses(
        (status = 200, description = "Student updated", body = Student),
        (status = 404, description = "Student not found")
    )
)]
pub async fn update_student(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateStudent>,
) -> AppResult<Json<Student>> {
    let student = state.services.students.update(id, &data).await?;
    Ok(Json(student))
}

/// Delete a student
#[utoipa::path(
    delete,
    path = "/students/{id}",
    tag = "students",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 204, description = "Student deleted"),
        (status = 404, description = "Student not found")
    )
)]
pub async fn delete_student(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.students.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Attendance history for one student
///
/// Loading the history backfills the student's trailing window first, so the
/// audit view never shows a day with missing subscribed slots.
#[utoipa::path(
    get,
    path = "/students/{id}/attendance",
    tag = "students",
    params(("id" = Uuid, Path, description = "Student ID"), HistoryQuery),
    responses(
        (status = 200, description = "Attendance history", body = Vec<AttendanceDetails>),
        (status = 404, description = "Student not found")
    )
)]
pub async fn get_student_history(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<AttendanceDetails>>> {
    let student = state.services.students.get(id).await?;

    if student.active {
        let today = Utc::now().date_naive();
        if let Err(e) = state.services.sync.sync_student(&student, today).await {
            tracing::warn!(student_id = %id, error = %e, "attendance sync failed on history load");
        }
    }

    let records = state.services.attendance.history(id, &query).await?;
    Ok(Json(records.into_iter().map(AttendanceDetails::from).collect()))
}
