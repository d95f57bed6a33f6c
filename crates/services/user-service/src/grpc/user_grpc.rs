//! gRPC implementation for UserService.

use std::sync::Arc;

use tonic::{Request, Response, Status};
use uuid::Uuid;

use crate::service::UserService;
use proto::user::{
    user_service_server::UserService as UserServiceProto, CreateUserRequest, DeleteUserRequest,
    DeleteUserResponse, GetUserByEmailRequest, GetUserRequest, InternalUserResponse,
    UpdateUserRequest, UserResponse,
};

/// gRPC service wrapper for UserService.
pub struct UserGrpcService {
    service: Arc<dyn UserService>,
}

impl UserGrpcService {
    /// Create a new gRPC service wrapper.
    pub fn new(service: Arc<dyn UserService>) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl UserServiceProto for UserGrpcService {
    async fn create_user(
        &self,
        request: Request<CreateUserRequest>,
    ) -> Result<Response<UserResponse>, Status> {
        let req = request.into_inner();

        let user = self
            .service
            .create_user(req.email, req.password, req.name)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(user_to_proto(&user)))
    }

    async fn get_user(
        &self,
        request: Request<GetUserRequest>,
    ) -> Result<Response<UserResponse>, Status> {
        let req = request.into_inner();
        let id = parse_uuid(&req.id)?;

        let user = self.service.get_user(id).await.map_err(Status::from)?;
        Ok(Response::new(user_to_proto(&user)))
    }

    async fn update_user(
        &self,
        request: Request<UpdateUserRequest>,
    ) -> Result<Response<UserResponse>, Status> {
        let req = request.into_inner();
        let id = parse_uuid(&req.id)?;

        let user = self
            .service
            .update_user(id, req.email, req.name, req.password)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(user_to_proto(&user)))
    }

    async fn delete_user(
        &self,
        request: Request<DeleteUserRequest>,
    ) -> Result<Response<DeleteUserResponse>, Status> {
        let req = request.into_inner();
        let id = parse_uuid(&req.id)?;

        self.service.delete_user(id).await.map_err(Status::from)?;
        Ok(Response::new(DeleteUserResponse { success: true }))
    }

    async fn get_user_by_email_internal(
        &self,
        request: Request<GetUserByEmailRequest>,
    ) -> Result<Response<InternalUserResponse>, Status> {
        let req = request.into_inner();

        let user = self
            .service
            .get_user_by_email_internal(&req.email)
            .await
            .map_err(Status::from)?;
        Ok(Response::new(internal_user_to_proto(&user)))
    }
}

/// Parse UUID from string.
fn parse_uuid(s: &str) -> Result<Uuid, Status> {
    Uuid::parse_str(s).map_err(|_| Status::invalid_argument("Invalid UUID format"))
}

/// Convert domain User to proto UserResponse (public - no password hash).
fn user_to_proto(user: &domain::User) -> UserResponse {
    UserResponse {
        id: user.id.to_string(),
        email: user.email.clone(),
        name: user.name.clone(),
        created_at: user.created_at.to_rfc3339(),
        updated_at: user.updated_at.to_rfc3339(),
    }
}

/// Convert domain User to proto InternalUserResponse (includes password hash).
fn internal_user_to_proto(user: &domain::User) -> InternalUserResponse {
    InternalUserResponse {
        id: user.id.to_string(),
        email: user.email.clone(),
        name: user.name.clone(),
        password_hash: user.password_hash.clone(),
        created_at: user.created_at.to_rfc3339(),
        updated_at: user.updated_at.to_rfc3339(),
    }
}
