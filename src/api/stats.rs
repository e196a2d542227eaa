//! Statistics endpoints

use axum::{extract::State, Json};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, models::enums::MealType};

/// Verified consumption count for one meal slot
#[derive(Debug, Serialize, ToSchema)]
pub struct MealCount {
    pub meal_type: MealType,
    pub label: String,
    pub verified: i64,
}

/// Dashboard figures
#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStats {
    pub date: NaiveDate,
    pub active_students: i64,
    pub meals_today: Vec<MealCount>,
    /// Meal charges settled this month, priced by the bundle table
    #[schema(value_type = f64)]
    pub collected_meals: Decimal,
    /// Extra charges settled this month
    #[schema(value_type = f64)]
    pub collected_extras: Decimal,
    #[schema(value_type = f64)]
    pub collected_total: Decimal,
}

/// Dashboard statistics
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Dashboard statistics", body = DashboardStats)
    )
)]
pub async fn get_stats(
    State(state): State<crate::AppState>,
) -> AppResult<Json<DashboardStats>> {
    let today = Utc::now().date_naive();
    let stats = state.services.stats.dashboard(today).await?;
    Ok(Json(stats))
}
