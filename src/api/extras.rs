//! Extra charges API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::extra::{CreateExtraCharge, ExtraCharge, ExtraQuery},
};

/// List a student's extra charges
#[utoipa::path(
    get,
    path = "/students/{id}/extras",
    tag = "extras",
    params(("id" = Uuid, Path, description = "Student ID"), ExtraQuery),
    responses(
        (status = 200, description = "Extra charges", body = Vec<ExtraCharge>),
        (status = 404, description = "Student not found")
    )
)]
pub async fn list_student_extras(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ExtraQuery>,
) -> AppResult<Json<Vec<ExtraCharge>>> {
    let extras = state.services.extras.list(id, query.date).await?;
    Ok(Json(extras))
}

/// Register an extra charge for a student
#[utoipa::path(
    post,
    path = "/students/{id}/extras",
    tag = "extras",
    params(("id" = Uuid, Path, description = "Student ID")),
    request_body = CreateExtraCharge,
    responses(
        (status = 201, description = "Extra charge created", body = ExtraCharge),
        (status = 404, description = "Student not found")
    )
)]
pub async fn create_student_extra(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<CreateExtraCharge>,
) -> AppResult<(StatusCode, Json<ExtraCharge>)> {
    let extra = state.services.extras.create(id, &data).await?;
    Ok((StatusCode::CREATED, Json(extra)))
}

/// Delete an extra charge
#[utoipa::path(
    delete,
    path = "/extras/{id}",
    tag = "extras",
    params(("id" = Uuid, Path, description = "Extra charge ID")),
    responses(
        (status = 204, description = "Extra charge deleted"),
        (status = 404, description = "Extra charge not found")
    )
)]
pub async fn delete_extra(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.extras.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
