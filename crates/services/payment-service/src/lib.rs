//! Payment Service Library
//!
//! This crate provides payment-intent processing via gRPC. Intents live
//! with an external provider reached through the [`provider::PaymentProvider`]
//! trait; the service persists tracking records and serves cache-first reads.

pub mod client;
pub mod config;
pub mod grpc;
pub mod infra;
pub mod provider;
pub mod repository;
pub mod service;

use std::net::SocketAddr;
use std::sync::Arc;

use tonic::transport::Server;
use tracing::{info, warn};

use common::{CacheStore, DisabledCache, RedisCache};

use crate::client::UserClient;
use crate::config::PaymentServiceConfig;
use crate::grpc::PaymentGrpcService;
use crate::infra::Database;
use crate::provider::{PaymentProvider, SandboxProvider};
use crate::repository::PgPaymentStore;
use crate::service::PaymentManager;

/// Run the payment service as an embedded component (for combined binary).
///
/// Uses the in-tree sandbox provider; a production deployment injects a
/// real provider via [`run_with_provider`].
pub async fn run_embedded(host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    run_with_provider(host, port, Arc::new(SandboxProvider::new())).await
}

/// Run the gRPC server with the given payment provider.
pub async fn run_with_provider(
    host: &str,
    port: u16,
    provider: Arc<dyn PaymentProvider>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = PaymentServiceConfig::from_env();

    // Initialize database
    let db = Database::connect(&config.database_url).await?;

    // Best-effort cache, same degradation policy as the user service.
    let cache: Arc<dyn CacheStore> = match RedisCache::connect(&config.redis_url).await {
        Ok(cache) => {
            info!("Redis cache connected");
            Arc::new(cache)
        }
        Err(err) => {
            warn!("Redis unreachable ({}), continuing without cache", err);
            Arc::new(DisabledCache)
        }
    };

    // User existence checks go through user-service.
    let user_client = Arc::new(UserClient::connect(&config.user_service_url).await?);

    let store = Arc::new(PgPaymentStore::new(db.get_connection()));
    let payment_service = Arc::new(PaymentManager::new(store, provider, user_client, cache));

    // Create gRPC service
    let grpc_service = PaymentGrpcService::new(payment_service);

    // Build address
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Payment service listening on {}", addr);

    // Run server
    Server::builder()
        .add_service(proto::PaymentServiceServer::new(grpc_service))
        .serve(addr)
        .await?;

    Ok(())
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = PaymentServiceConfig::from_env();
    let db = Database::connect_without_migrations(&config.database_url).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            db.migration_status().await?;
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
