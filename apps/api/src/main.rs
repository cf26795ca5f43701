//! Warden API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod auth;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use axum::Router;
use tracing::info;
use warden_application::{CatalogSeedService, SeedCatalog};
use warden_core::AppError;
use warden_infrastructure::InMemoryRbacStore;

use crate::api_config::{ApiConfig, StoreConfig, init_tracing};
use crate::api_services::{
    RbacStores, build_app_state, build_memory_session_layer, build_postgres_session_layer,
    connect_and_migrate, provision_dev_user,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let app = match &config.store {
        StoreConfig::Postgres { database_url } => {
            let pool = connect_and_migrate(database_url).await?;
            if config.migrate_only {
                info!("database migrations applied successfully");
                return Ok(());
            }

            let (app_state, catalog_seed_service) =
                build_app_state(RbacStores::postgres(&pool), config.bootstrap_token.clone());
            seed_catalog(&config, &catalog_seed_service).await?;

            let session_layer = build_postgres_session_layer(pool, config.cookie_secure).await?;
            api_router::build_router(app_state, &config.frontend_url, session_layer)?
        }
        StoreConfig::InMemory => {
            let store = Arc::new(InMemoryRbacStore::new());
            let (app_state, catalog_seed_service) = build_app_state(
                RbacStores::in_memory(store.clone()),
                config.bootstrap_token.clone(),
            );
            seed_catalog(&config, &catalog_seed_service).await?;
            provision_dev_user(&store).await?;

            let session_layer = build_memory_session_layer(config.cookie_secure);
            api_router::build_router(app_state, &config.frontend_url, session_layer)?
        }
    };

    serve(&config, app).await
}

async fn seed_catalog(
    config: &ApiConfig,
    catalog_seed_service: &CatalogSeedService,
) -> Result<(), AppError> {
    if !config.seed_catalog {
        return Ok(());
    }

    catalog_seed_service.seed(&SeedCatalog::default()).await?;
    Ok(())
}

async fn serve(config: &ApiConfig, app: Router) -> Result<(), AppError> {
    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "warden-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
