use crate::api::handlers;
use crate::types::{
    CreateCustomerRequest, CustomerListResponse, CustomerResponse, DeleteResponse, LoginRequest,
    LoginResponse, LogoutResponse, NewProfile, ProductListResponse, ProductRequest,
    ProductResponse, ProfileResponse, RegisterRequest, SessionResponse, UpdateCustomerRequest,
    UpdateProfileRequest, UpdateUserRequest, UserListResponse, UserResponse,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

/// OpenAPI document for every `/api` endpoint.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::current_session,
        handlers::users::register,
        handlers::users::list_users,
        handlers::users::get_user,
        handlers::users::update_user,
        handlers::users::update_profile,
        handlers::products::list_products,
        handlers::products::create_product,
        handlers::products::get_product,
        handlers::products::replace_product,
        handlers::products::delete_product,
        handlers::customers::list_customers,
        handlers::customers::create_customer,
        handlers::customers::get_customer,
        handlers::customers::update_customer,
        handlers::customers::delete_customer,
    ),
    components(schemas(
        LoginRequest,
        LoginResponse,
        LogoutResponse,
        SessionResponse,
        RegisterRequest,
        NewProfile,
        UpdateUserRequest,
        UpdateProfileRequest,
        ProfileResponse,
        UserResponse,
        UserListResponse,
        ProductRequest,
        ProductResponse,
        ProductListResponse,
        CreateCustomerRequest,
        UpdateCustomerRequest,
        CustomerResponse,
        CustomerListResponse,
        DeleteResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Login, logout and session inspection"),
        (name = "users", description = "Users and their profiles"),
        (name = "products", description = "Product catalogue"),
        (name = "customers", description = "Customer accounts")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
