//! Shared domain enums

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// MealType
// ---------------------------------------------------------------------------

/// Meal service slots offered by the cafeteria.
///
/// Stored as a smallint code; the Spanish display label lives only at the
/// presentation boundary (`label()`), never as an internal match key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum MealType {
    Breakfast = 1,
    Lunch = 2,
    Dinner = 3,
}

impl MealType {
    /// All meal types, in service order.
    pub const ALL: [MealType; 3] = [MealType::Breakfast, MealType::Lunch, MealType::Dinner];

    /// Decode a stored smallint code. Unknown codes yield `None` and are
    /// treated as absent by the billing engine rather than failing the row.
    pub fn from_code(v: i16) -> Option<Self> {
        match v {
            1 => Some(MealType::Breakfast),
            2 => Some(MealType::Lunch),
            3 => Some(MealType::Dinner),
            _ => None,
        }
    }

    pub fn code(self) -> i16 {
        self as i16
    }

    /// Display label shown on tickets and kiosk screens.
    pub fn label(self) -> &'static str {
        match self {
            MealType::Breakfast => "Desayuno",
            MealType::Lunch => "Almuerzo",
            MealType::Dinner => "Cena",
        }
    }
}

impl From<MealType> for i16 {
    fn from(m: MealType) -> Self {
        m as i16
    }
}

impl std::fmt::Display for MealType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            _ => Err(format!("Invalid meal type: {}", s)),
        }
    }
}

// ---------------------------------------------------------------------------
// AttendanceStatus
// ---------------------------------------------------------------------------

/// Status of one attendance record.
///
/// `Verified` and `AutoSubscribed` are the chargeable class. `AutoSubscribed`
/// marks records synthesized by the attendance sync pass, so audit views can
/// always distinguish "student confirmed" from "system assumed".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum AttendanceStatus {
    /// Student explicitly confirmed consumption.
    Verified = 1,
    /// Student reported non-attendance in advance ("Aviso").
    Excused = 2,
    /// Administratively voided.
    Annulled = 3,
    /// Synthesized by the sync pass from the subscribed meal plan.
    AutoSubscribed = 4,
}

impl AttendanceStatus {
    pub fn from_code(v: i16) -> Option<Self> {
        match v {
            1 => Some(AttendanceStatus::Verified),
            2 => Some(AttendanceStatus::Excused),
            3 => Some(AttendanceStatus::Annulled),
            4 => Some(AttendanceStatus::AutoSubscribed),
            _ => None,
        }
    }

    pub fn code(self) -> i16 {
        self as i16
    }

    /// Whether this status counts toward the daily charge.
    pub fn is_chargeable(self) -> bool {
        matches!(self, AttendanceStatus::Verified | AttendanceStatus::AutoSubscribed)
    }

    pub fn label(self) -> &'static str {
        match self {
            AttendanceStatus::Verified => "Verificado",
            AttendanceStatus::Excused => "Aviso",
            AttendanceStatus::Annulled => "Anulado",
            AttendanceStatus::AutoSubscribed => "Suscripción",
        }
    }
}

impl From<AttendanceStatus> for i16 {
    fn from(s: AttendanceStatus) -> Self {
        s as i16
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
