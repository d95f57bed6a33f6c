//! gRPC implementation for AuthService.

use std::sync::Arc;

use tonic::{Request, Response, Status};

use crate::service::AuthService;
use proto::auth::{
    auth_service_server::AuthService as AuthServiceProto, LoginRequest, LoginResponse,
    VerifyTokenRequest, VerifyTokenResponse,
};

/// gRPC service wrapper for AuthService.
pub struct AuthGrpcService {
    service: Arc<dyn AuthService>,
}

impl AuthGrpcService {
    /// Create a new gRPC service wrapper.
    pub fn new(service: Arc<dyn AuthService>) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl AuthServiceProto for AuthGrpcService {
    async fn login(
        &self,
        request: Request<LoginRequest>,
    ) -> Result<Response<LoginResponse>, Status> {
        let req = request.into_inner();

        let token = self
            .service
            .login(req.email, req.password)
            .await
            .map_err(Status::from)?;

        Ok(Response::new(LoginResponse {
            access_token: token.access_token,
            token_type: token.token_type,
            expires_in: token.expires_in,
            user_id: token.user_id.to_string(),
        }))
    }

    async fn verify_token(
        &self,
        request: Request<VerifyTokenRequest>,
    ) -> Result<Response<VerifyTokenResponse>, Status> {
        let req = request.into_inner();

        match self.service.verify_token(&req.token) {
            Ok(claims) => Ok(Response::new(VerifyTokenResponse {
                valid: true,
                user_id: claims.sub.to_string(),
                email: claims.email,
            })),
            Err(_) => Ok(Response::new(VerifyTokenResponse {
                valid: false,
                user_id: String::new(),
                email: String::new(),
            })),
        }
    }
}
