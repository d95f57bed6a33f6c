//! gRPC client for payment-service.

use tonic::transport::Channel;
use tracing::debug;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::Payment;
use proto::payment::{
    payment_service_client::PaymentServiceClient as ProtoPaymentServiceClient,
    CreatePaymentIntentRequest, RetrievePaymentIntentRequest,
};

/// gRPC client wrapper for payment-service.
pub struct PaymentClient {
    client: ProtoPaymentServiceClient<Channel>,
}

impl PaymentClient {
    /// Connect to payment-service.
    pub async fn connect(endpoint: &str) -> Result<Self, tonic::transport::Error> {
        debug!("Connecting to payment-service at {}", endpoint);
        let client = ProtoPaymentServiceClient::connect(endpoint.to_string()).await?;
        Ok(Self { client })
    }

    /// Create a payment intent; returns the record and the client secret.
    pub async fn create_payment_intent(
        &self,
        user_id: Uuid,
        amount_minor: i64,
        currency: String,
    ) -> AppResult<(Payment, String)> {
        let request = tonic::Request::new(CreatePaymentIntentRequest {
            user_id: user_id.to_string(),
            amount_minor,
            currency,
        });

        let mut client = self.client.clone();
        let response = client
            .create_payment_intent(request)
            .await
            .map_err(AppError::from)?;
        let proto = response.into_inner();

        let payment = proto
            .payment
            .ok_or_else(|| AppError::internal("Missing payment in response"))?;

        Ok((proto_to_payment(payment)?, proto.client_secret))
    }

    /// Retrieve a payment intent by provider id.
    pub async fn retrieve_payment_intent(&self, provider_id: String) -> AppResult<Payment> {
        let request = tonic::Request::new(RetrievePaymentIntentRequest { provider_id });

        let mut client = self.client.clone();
        let response = client
            .retrieve_payment_intent(request)
            .await
            .map_err(AppError::from)?;

        proto_to_payment(response.into_inner())
    }
}

/// Convert proto PaymentResponse to domain Payment.
fn proto_to_payment(proto: proto::payment::PaymentResponse) -> AppResult<Payment> {
    let id = proto
        .id
        .parse()
        .map_err(|_| AppError::internal("Invalid UUID from payment-service"))?;
    let user_id = proto
        .user_id
        .parse()
        .map_err(|_| AppError::internal("Invalid UUID from payment-service"))?;

    let created_at = chrono::DateTime::parse_from_rfc3339(&proto.created_at)
        .map_err(|_| AppError::internal("Invalid created_at from payment-service"))?
        .with_timezone(&chrono::Utc);

    let updated_at = chrono::DateTime::parse_from_rfc3339(&proto.updated_at)
        .map_err(|_| AppError::internal("Invalid updated_at from payment-service"))?
        .with_timezone(&chrono::Utc);

    Ok(Payment {
        id,
        user_id,
        amount_minor: proto.amount_minor,
        currency: proto.currency,
        provider_id: proto.provider_id,
        status: proto.status,
        created_at,
        updated_at,
    })
}
