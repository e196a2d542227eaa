//! Student (pensionista) model and related types

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::enums::MealType;

static RE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{9}$").unwrap());
static RE_DNI: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{8}$").unwrap());
static RE_PHONE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^9\d{8}$").unwrap());

/// Student model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Unique 9-digit enrollment code
    pub code: String,
    pub dni: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub parent_phone: Option<String>,
    pub address: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub career: Option<String>,
    pub joined_date: Option<NaiveDate>,
    /// Contracted meal plan, as stored smallint codes
    pub subscribed_meals: Vec<i16>,
    pub notes: Option<String>,
    pub avatar_url: Option<String>,
    pub active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Decoded subscribed meal set. Unknown stored codes are skipped.
    pub fn meal_plan(&self) -> Vec<MealType> {
        self.subscribed_meals
            .iter()
            .filter_map(|c| MealType::from_code(*c))
            .collect()
    }
}

/// Create student request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStudent {
    #[validate(length(min = 2, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 2, message = "Last name is required"))]
    pub last_name: String,
    #[validate(regex(path = *RE_CODE, message = "Code must be exactly 9 digits"))]
    pub code: String,
    #[validate(regex(path = *RE_DNI, message = "DNI must be exactly 8 digits"))]
    pub dni: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(regex(path = *RE_PHONE, message = "Phone must be 9 digits starting with 9"))]
    pub phone: Option<String>,
    pub parent_phone: Option<String>,
    #[validate(length(min = 5, message = "Address is too short"))]
    pub address: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub career: Option<String>,
    pub joined_date: Option<NaiveDate>,
    /// Contracted meal plan
    pub subscribed_meals: Vec<MealType>,
    pub notes: Option<String>,
    pub avatar_url: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Update student request (partial)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStudent {
    #[validate(length(min = 2, message = "First name is required"))]
    pub first_name: Option<String>,
    #[validate(length(min = 2, message = "Last name is required"))]
    pub last_name: Option<String>,
    #[validate(regex(path = *RE_DNI, message = "DNI must be exactly 8 digits"))]
    pub dni: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(regex(path = *RE_PHONE, message = "Phone must be 9 digits starting with 9"))]
    pub phone: Option<String>,
    pub parent_phone: Option<String>,
    #[validate(length(min = 5, message = "Address is too short"))]
    pub address: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub career: Option<String>,
    pub subscribed_meals: Option<Vec<MealType>>,
    pub notes: Option<String>,
    pub avatar_url: Option<String>,
    pub active: Option<bool>,
}

/// Query parameters for listing students
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct StudentQuery {
    /// Matches first name, last name or enrollment code (case-insensitive)
    pub search: Option<String>,
    /// Restrict to active (true) or inactive (false) students
    pub active: Option<bool>,
}
