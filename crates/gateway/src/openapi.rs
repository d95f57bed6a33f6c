//! OpenAPI documentation.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::clients::TokenResponse;
use crate::handlers::{
    CreatePaymentIntentRequest, CreatePaymentIntentResponse, LoginRequest, RegisterRequest,
    RetrievePaymentIntentRequest, UpdateUserRequest,
};
use domain::{Payment, UserView};

/// API documentation root.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Account API",
        description = "User account management and payment-intent processing"
    ),
    paths(
        crate::handlers::auth_handler::register,
        crate::handlers::auth_handler::login,
        crate::handlers::user_handler::get_current_user,
        crate::handlers::user_handler::get_user,
        crate::handlers::user_handler::update_user,
        crate::handlers::user_handler::delete_user,
        crate::handlers::payment_handler::create_payment_intent,
        crate::handlers::payment_handler::retrieve_payment_intent,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        UpdateUserRequest,
        CreatePaymentIntentRequest,
        RetrievePaymentIntentRequest,
        CreatePaymentIntentResponse,
        TokenResponse,
        UserView,
        Payment,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration and login"),
        (name = "Users", description = "User account management"),
        (name = "Payments", description = "Payment intents")
    )
)]
pub struct ApiDoc;

/// Registers the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
