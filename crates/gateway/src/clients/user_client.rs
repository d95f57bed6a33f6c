//! gRPC client for user-service.

use tonic::transport::Channel;
use tracing::debug;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::UserView;
use proto::user::{
    user_service_client::UserServiceClient as ProtoUserServiceClient, CreateUserRequest,
    DeleteUserRequest, GetUserRequest, UpdateUserRequest,
};

/// gRPC client wrapper for user-service.
pub struct UserClient {
    client: ProtoUserServiceClient<Channel>,
}

impl UserClient {
    /// Connect to user-service.
    pub async fn connect(endpoint: &str) -> Result<Self, tonic::transport::Error> {
        debug!("Connecting to user-service at {}", endpoint);
        let client = ProtoUserServiceClient::connect(endpoint.to_string()).await?;
        Ok(Self { client })
    }

    /// Create a new user; the plaintext password is hashed by the
    /// lifecycle manager, never here.
    pub async fn create_user(
        &self,
        email: String,
        password: String,
        name: String,
    ) -> AppResult<UserView> {
        let request = tonic::Request::new(CreateUserRequest {
            email,
            password,
            name,
        });

        let mut client = self.client.clone();
        let response = client.create_user(request).await.map_err(AppError::from)?;
        proto_to_view(response.into_inner())
    }

    /// Get user by ID.
    pub async fn get_user(&self, id: Uuid) -> AppResult<UserView> {
        let request = tonic::Request::new(GetUserRequest { id: id.to_string() });

        let mut client = self.client.clone();
        let response = client.get_user(request).await.map_err(AppError::from)?;
        proto_to_view(response.into_inner())
    }

    /// Update user fields.
    pub async fn update_user(
        &self,
        id: Uuid,
        email: Option<String>,
        name: Option<String>,
        password: Option<String>,
    ) -> AppResult<UserView> {
        let request = tonic::Request::new(UpdateUserRequest {
            id: id.to_string(),
            email,
            name,
            password,
        });

        let mut client = self.client.clone();
        let response = client.update_user(request).await.map_err(AppError::from)?;
        proto_to_view(response.into_inner())
    }

    /// Delete user.
    pub async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        let request = tonic::Request::new(DeleteUserRequest { id: id.to_string() });

        let mut client = self.client.clone();
        client.delete_user(request).await.map_err(AppError::from)?;
        Ok(())
    }
}

/// Convert proto UserResponse to the client-facing view.
fn proto_to_view(proto: proto::user::UserResponse) -> AppResult<UserView> {
    let id = proto
        .id
        .parse()
        .map_err(|_| AppError::internal("Invalid UUID from user-service"))?;

    let created_at = chrono::DateTime::parse_from_rfc3339(&proto.created_at)
        .map_err(|_| AppError::internal("Invalid created_at from user-service"))?
        .with_timezone(&chrono::Utc);

    let updated_at = chrono::DateTime::parse_from_rfc3339(&proto.updated_at)
        .map_err(|_| AppError::internal("Invalid updated_at from user-service"))?
        .with_timezone(&chrono::Utc);

    Ok(UserView {
        id,
        email: proto.email,
        name: proto.name,
        created_at,
        updated_at,
    })
}
