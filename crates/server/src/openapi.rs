use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String, pub message: String }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct CreateBikeRequest {
    pub bike_name: String,
    pub year: i32,
    pub registration_number: String,
    pub owner_phone: String,
    /// Exactly 12 digits
    pub owner_aadhar: String,
    pub owner_address: String,
    pub purchase_price: f64,
    pub selling_price: f64,
    pub bike_image_url: Option<String>,
    pub aadhar_image_url: Option<String>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct UpdateBikeRequest {
    pub bike_name: Option<String>,
    pub year: Option<i32>,
    pub registration_number: Option<String>,
    pub owner_phone: Option<String>,
    pub owner_aadhar: Option<String>,
    pub owner_address: Option<String>,
    pub purchase_price: Option<f64>,
    pub selling_price: Option<f64>,
    pub bike_image_url: Option<String>,
    pub aadhar_image_url: Option<String>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct MarkSoldRequest {
    pub sale_price: f64,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_aadhar: String,
    pub customer_address: String,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    /// `admin` or `worker`
    pub role: String,
    pub display_name: String,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub role: Option<String>,
    pub display_name: Option<String>,
}

#[derive(ToSchema)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    /// `bike` or `aadhar`
    #[schema(rename = "type")]
    pub category: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::login,
        crate::routes::bikes::list,
        crate::routes::bikes::create,
        crate::routes::bikes::get,
        crate::routes::bikes::update,
        crate::routes::bikes::delete,
        crate::routes::sales::mark_sold,
        crate::routes::sales::list,
        crate::routes::sales::get,
        crate::routes::sales::by_bike,
        crate::routes::sales::clear_all,
        crate::routes::analytics::kpi,
        crate::routes::analytics::monthly_sales,
        crate::routes::users::list,
        crate::routes::users::get,
        crate::routes::users::create,
        crate::routes::users::update,
        crate::routes::users::delete,
        crate::routes::upload::upload,
        crate::routes::upload::storage_test,
    ),
    components(
        schemas(
            HealthResponse,
            LoginRequest,
            CreateBikeRequest,
            UpdateBikeRequest,
            MarkSoldRequest,
            CreateUserRequest,
            UpdateUserRequest,
            UploadForm,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "bikes"),
        (name = "sales"),
        (name = "analytics"),
        (name = "users"),
        (name = "upload")
    )
)]
pub struct ApiDoc;
