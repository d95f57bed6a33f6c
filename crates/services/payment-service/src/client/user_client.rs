//! gRPC client for user-service.

use async_trait::async_trait;
use tonic::transport::Channel;
use tracing::debug;
use uuid::Uuid;

use common::{AppError, AppResult};
use proto::user::{
    user_service_client::UserServiceClient as ProtoUserServiceClient, GetUserRequest,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// The single question the payment flow asks about users.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Whether an active user with this id exists.
    async fn user_exists(&self, id: Uuid) -> AppResult<bool>;
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
impl UserDirectory for UserClient {
    async fn user_exists(&self, id: Uuid) -> AppResult<bool> {
        let request = tonic::Request::new(GetUserRequest { id: id.to_string() });

        let mut client = self.client.clone();
        match client.get_user(request).await {
            Ok(_) => Ok(true),
            Err(status) if status.code() == tonic::Code::NotFound => Ok(false),
            Err(status) => Err(AppError::from(status)),
        }
    }
}
