//! gRPC client for user-service.

use async_trait::async_trait;
use tonic::transport::Channel;
use tracing::debug;

use common::{AppError, AppResult};
use domain::User;
use proto::user::{
    user_service_client::UserServiceClient as ProtoUserServiceClient, GetUserByEmailRequest,
    InternalUserResponse,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// The user lookup auth-service needs: one call, credential included.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserServiceClient: Send + Sync {
    /// Find an active user by email, password hash included.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
}

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
}

#[async_trait]
impl UserServiceClient for UserClient {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let request = tonic::Request::new(GetUserByEmailRequest {
            email: email.to_string(),
        });

        let mut client = self.client.clone();
        // The internal endpoint is the only one that carries the hash.
        match client.get_user_by_email_internal(request).await {
            Ok(response) => Ok(Some(internal_proto_to_user(response.into_inner())?)),
            Err(status) if status.code() == tonic::Code::NotFound => Ok(None),
            Err(status) => Err(AppError::from(status)),
        }
    }
}

/// Convert proto InternalUserResponse to domain User (includes password hash).
fn internal_proto_to_user(proto: InternalUserResponse) -> AppResult<User> {
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

    Ok(User {
        id,
        email: proto.email,
        password_hash: proto.password_hash,
        name: proto.name,
        created_at,
        updated_at,
        deleted_at: None,
    })
}
