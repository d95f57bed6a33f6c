//! Payment handlers.

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::Json,
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use common::AppResult;
use domain::Payment;

use crate::extractors::ValidatedJson;
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Payment intent creation request with validation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePaymentIntentRequest {
    /// Amount in integer minor units (e.g. cents)
    #[validate(range(min = 1, message = "Amount must be positive"))]
    #[schema(example = 1999)]
    pub amount_minor: i64,
    /// ISO 4217 currency code
    #[validate(length(equal = 3, message = "Currency must be a 3-letter code"))]
    #[schema(example = "usd")]
    pub currency: String,
}

/// Payment intent retrieval request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RetrievePaymentIntentRequest {
    /// Provider intent identifier
    #[validate(length(min = 1, message = "Payment intent id cannot be empty"))]
    #[schema(example = "pi_3MtwBwLkdIwHu7ix28a3tqPa")]
    pub payment_intent_id: String,
}

/// Payment intent creation response
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatePaymentIntentResponse {
    pub payment: Payment,
    /// Provider client secret for completing the payment client-side
    pub client_secret: String,
}

/// Create payment routes
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/payment-intent", post(create_payment_intent))
        .route("/retrieve", post(retrieve_payment_intent))
}

/// Create a payment intent for the authenticated user
#[utoipa::path(
    post,
    path = "/payments/payment-intent",
    tag = "Payments",
    security(("bearer_auth" = [])),
    request_body = CreatePaymentIntentRequest,
    responses(
        (status = 201, description = "Payment intent created", body = CreatePaymentIntentResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create_payment_intent(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreatePaymentIntentRequest>,
) -> AppResult<(StatusCode, Json<CreatePaymentIntentResponse>)> {
    let (payment, client_secret) = state
        .payment_client
        .create_payment_intent(current_user.id, payload.amount_minor, payload.currency)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatePaymentIntentResponse {
            payment,
            client_secret,
        }),
    ))
}

/// Retrieve a payment intent's current state
#[utoipa::path(
    post,
    path = "/payments/retrieve",
    tag = "Payments",
    security(("bearer_auth" = [])),
    request_body = RetrievePaymentIntentRequest,
    responses(
        (status = 200, description = "Payment intent state", body = Payment),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Payment not found")
    )
)]
pub async fn retrieve_payment_intent(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RetrievePaymentIntentRequest>,
) -> AppResult<Json<Payment>> {
    let payment = state
        .payment_client
        .retrieve_payment_intent(payload.payment_intent_id)
        .await?;

    Ok(Json(payment))
}
