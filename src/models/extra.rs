//! Extra charge model (ad-hoc priced items outside the meal schedule)

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Extra charge record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ExtraCharge {
    pub id: Uuid,
    pub student_id: Uuid,
    pub title: String,
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub is_paid: bool,
    pub payment_date: Option<DateTime<Utc>>,
}

/// Create extra charge request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateExtraCharge {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[schema(value_type = f64)]
    pub price: Decimal,
}

/// Query parameters for listing a student's extras
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ExtraQuery {
    /// Restrict to extras created on this day
    pub date: Option<NaiveDate>,
}
