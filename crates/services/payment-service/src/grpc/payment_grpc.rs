//! gRPC implementation for PaymentService.

use std::sync::Arc;

use tonic::{Request, Response, Status};
use uuid::Uuid;

use crate::service::PaymentService;
use proto::payment::{
    payment_service_server::PaymentService as PaymentServiceProto, CreatePaymentIntentRequest,
    CreatePaymentIntentResponse, PaymentResponse, RetrievePaymentIntentRequest,
};

/// gRPC service wrapper for PaymentService.
pub struct PaymentGrpcService {
    service: Arc<dyn PaymentService>,
}

impl PaymentGrpcService {
    /// Create a new gRPC service wrapper.
    pub fn new(service: Arc<dyn PaymentService>) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl PaymentServiceProto for PaymentGrpcService {
    async fn create_payment_intent(
        &self,
        request: Request<CreatePaymentIntentRequest>,
    ) -> Result<Response<CreatePaymentIntentResponse>, Status> {
        let req = request.into_inner();
        let user_id = parse_uuid(&req.user_id)?;

        let (payment, client_secret) = self
            .service
            .create_payment_intent(user_id, req.amount_minor, req.currency)
            .await
            .map_err(Status::from)?;

        Ok(Response::new(CreatePaymentIntentResponse {
            payment: Some(payment_to_proto(&payment)),
            client_secret,
        }))
    }

    async fn retrieve_payment_intent(
        &self,
        request: Request<RetrievePaymentIntentRequest>,
    ) -> Result<Response<PaymentResponse>, Status> {
        let req = request.into_inner();

        let payment = self
            .service
            .retrieve_payment_intent(&req.provider_id)
            .await
            .map_err(Status::from)?;

        Ok(Response::new(payment_to_proto(&payment)))
    }
}

/// Parse UUID from string.
fn parse_uuid(s: &str) -> Result<Uuid, Status> {
    Uuid::parse_str(s).map_err(|_| Status::invalid_argument("Invalid UUID format"))
}

/// Convert domain Payment to proto PaymentResponse.
fn payment_to_proto(payment: &domain::Payment) -> PaymentResponse {
    PaymentResponse {
        id: payment.id.to_string(),
        user_id: payment.user_id.to_string(),
        amount_minor: payment.amount_minor,
        currency: payment.currency.clone(),
        provider_id: payment.provider_id.clone(),
        status: payment.status.clone(),
        created_at: payment.created_at.to_rfc3339(),
        updated_at: payment.updated_at.to_rfc3339(),
    }
}
