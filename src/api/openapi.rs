//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{attendance, billing, extras, health, stats, students};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Comedor API",
        version = "0.3.0",
        description = "Cafeteria meal-plan administration REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Students
        students::list_students,
        students::get_student,
        students::create_student,
        students::update_student,
        students::delete_student,
        students::get_student_history,
        // Attendance
        attendance::day_board,
        attendance::register_attendance,
        attendance::set_attendance_status,
        attendance::delete_attendance,
        // Extras
        extras::list_student_extras,
        extras::create_student_extra,
        extras::delete_extra,
        // Billing
        billing::get_student_billing,
        billing::settle_student,
        // Stats
        stats::get_stats,
    ),
    components(
        schemas(
            // Health
            health::HealthResponse,
            // Students
            crate::models::student::Student,
            crate::models::student::CreateStudent,
            crate::models::student::UpdateStudent,
            // Attendance
            crate::models::enums::MealType,
            crate::models::enums::AttendanceStatus,
            crate::models::attendance::AttendanceRecord,
            crate::models::attendance::AttendanceDetails,
            crate::models::attendance::RegisterAttendance,
            crate::models::attendance::SetAttendanceStatus,
            // Extras
            crate::models::extra::ExtraCharge,
            crate::models::extra::CreateExtraCharge,
            // Billing
            crate::services::billing::DayCharge,
            crate::services::billing::BillingStatement,
            crate::services::billing::PaymentReceipt,
            billing::SettleRequest,
            // Stats
            stats::MealCount,
            stats::DashboardStats,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Service health"),
        (name = "students", description = "Student management"),
        (name = "attendance", description = "Meal attendance"),
        (name = "extras", description = "Ad-hoc extra charges"),
        (name = "billing", description = "Pricing and settlement"),
        (name = "stats", description = "Dashboard statistics")
    )
)]
pub struct ApiDoc;

/// Create the Swagger UI router serving the OpenAPI document
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
