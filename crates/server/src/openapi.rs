use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct RegisterAdminRequest { pub tenant_name: String, pub username: String, pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct RegisterUserRequest { pub tenant_id: Uuid, pub username: String, pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub tenant_id: Uuid, pub username: String, pub password: String }

#[derive(ToSchema)]
pub struct ChangePasswordRequest { pub new_password: String }

#[derive(ToSchema)]
pub struct UpdateProfileRequest {
    /// `user`, `manager` or `admin`
    pub role: Option<String>,
    pub branch: Option<String>,
    /// `Active` or `Blocked`
    pub status: Option<String>,
}

#[derive(ToSchema)]
pub struct ServiceRequest {
    pub name: String,
    pub description: Option<String>,
    pub included: Option<String>,
    pub duration_minutes: i32,
    pub cost_cents: i64,
    pub availability: Option<bool>,
}

#[derive(ToSchema)]
pub struct ProductRequest {
    pub name: String,
    pub description: Option<String>,
    /// Defaults to `Food`
    pub category: Option<String>,
    /// Defaults to `piece`
    pub unit_of_measure: Option<String>,
    pub stocks: Option<i32>,
    pub price_cents: i64,
    pub is_available: Option<bool>,
}

#[derive(ToSchema)]
pub struct CreateAppointmentRequest {
    /// Service id
    pub service: Uuid,
    /// RFC 3339, or `YYYY-MM-DDThh:mm[:ss]` read as UTC
    pub start_time: String,
}

#[derive(ToSchema)]
pub struct CreateOrderRequest { pub service: Uuid }

#[derive(ToSchema)]
pub struct PetRequest {
    pub pet_name: String,
    pub pet_breed: String,
    pub age: String,
    pub allergies: Option<String>,
    pub notes: Option<String>,
}

#[derive(ToSchema)]
pub struct FeedbackRequest {
    /// 1..=5
    pub rating: i32,
    pub feedback_text: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register_admin,
        crate::routes::auth::register_user,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::me,
        crate::routes::auth::change_password,
        crate::routes::auth::deactivate,
        crate::routes::accounts::login_logs,
        crate::routes::accounts::block_user,
        crate::routes::accounts::staff,
        crate::routes::accounts::update_profile,
        crate::routes::accounts::delete_user,
        crate::routes::catalog::list_services,
        crate::routes::catalog::create_service,
        crate::routes::catalog::get_service,
        crate::routes::catalog::update_service,
        crate::routes::catalog::toggle_service,
        crate::routes::catalog::delete_service,
        crate::routes::catalog::list_products,
        crate::routes::catalog::inventory,
        crate::routes::catalog::create_product,
        crate::routes::catalog::get_product,
        crate::routes::catalog::update_product,
        crate::routes::catalog::toggle_product,
        crate::routes::catalog::delete_product,
        crate::routes::care::list_orders,
        crate::routes::care::create_order,
        crate::routes::care::list_pets,
        crate::routes::care::create_pet,
        crate::routes::care::delete_pet,
        crate::routes::care::submit_feedback,
        crate::routes::care::gallery,
        crate::routes::appointments::create,
        crate::routes::appointments::booked,
        crate::routes::appointments::my_upcoming,
        crate::routes::appointments::all,
        crate::routes::appointments::cancel,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterAdminRequest,
            RegisterUserRequest,
            LoginRequest,
            ChangePasswordRequest,
            UpdateProfileRequest,
            ServiceRequest,
            ProductRequest,
            CreateAppointmentRequest,
            CreateOrderRequest,
            PetRequest,
            FeedbackRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "accounts"),
        (name = "catalog"),
        (name = "inventory"),
        (name = "orders"),
        (name = "pets"),
        (name = "feedback"),
        (name = "appointments")
    )
)]
pub struct ApiDoc;
