//! Billing API endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    error::AppResult,
    services::billing::{BillingStatement, PaymentReceipt},
};

/// Query parameters for a billing statement
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct BillingQuery {
    /// Start of the date range (inclusive)
    pub from: Option<NaiveDate>,
    /// End of the date range (inclusive)
    pub to: Option<NaiveDate>,
}

/// Settle request
#[derive(Debug, Deserialize, ToSchema)]
pub struct SettleRequest {
    /// Settle unpaid charges up to and including this day (defaults to today)
    pub through: Option<NaiveDate>,
}

/// Priced per-day breakdown and outstanding balance for a student
#[utoipa::path(
    get,
    path = "/students/{id}/billing",
    tag = "billing",
    params(("id" = Uuid, Path, description = "Student ID"), BillingQuery),
    responses(
        (status = 200, description = "Billing statement", body = BillingStatement),
        (status = 404, description = "Student not found")
    )
)]
pub async fn get_student_billing(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<BillingQuery>,
) -> AppResult<Json<BillingStatement>> {
    let statement = state
        .services
        .billing
        .statement(id, query.from, query.to)
        .await?;
    Ok(Json(statement))
}

/// Settle a student's outstanding charges
#[utoipa::path(
    post,
    path = "/students/{id}/payments",
    tag = "billing",
    params(("id" = Uuid, Path, description = "Student ID")),
    request_body = SettleRequest,
    responses(
        (status = 200, description = "Payment receipt", body = PaymentReceipt),
        (status = 404, description = "Student not found")
    )
)]
pub async fn settle_student(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Json(data): Json<SettleRequest>,
) -> AppResult<Json<PaymentReceipt>> {
    let now = Utc::now();
    let through = data.through.unwrap_or_else(|| now.date_naive());
    let receipt = state.services.billing.settle(id, through, now).await?;
    Ok(Json(receipt))
}
