//! Shared application state

use crate::{
    auth::TokenManager,
    config::Config,
    db::{
        AccountRepository, ContactRepository, EmergencyResourceRepository, FavoriteRepository,
        MedicalIssueRepository, ProfileRepository, SearchRepository,
    },
    services::{
        AccountService, CatalogService, ContactService, FavoriteService, ProfileService,
        ProfileUpdateService, SearchService,
    },
    Result,
};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AppStateOptions {
    pub run_migrations: bool,
}

impl Default for AppStateOptions {
    fn default() -> Self {
        Self {
            run_migrations: true,
        }
    }
}

/// Shared application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db_pool: PgPool,
    pub tokens: Arc<TokenManager>,
    pub account_service: Arc<AccountService>,
    pub profile_service: Arc<ProfileService>,
    pub favorite_service: Arc<FavoriteService>,
    pub contact_service: Arc<ContactService>,
    pub search_service: Arc<SearchService>,
    pub catalog_service: Arc<CatalogService>,
}

impl AppState {
    /// Initialize the application state
    pub async fn new(config: Config) -> Result<Self> {
        let options = AppStateOptions {
            run_migrations: config.database.run_migrations,
        };
        Self::new_with_options(config, options).await
    }

    pub async fn new_with_options(config: Config, options: AppStateOptions) -> Result<Self> {
        tracing::info!("Initializing application state...");

        // Create database connection pool
        let db_pool = create_db_pool(&config).await?;

        // Run migrations
        if options.run_migrations {
            run_migrations(&db_pool).await?;
        }

        let state = Self::from_pool(config, db_pool);
        tracing::info!("Application state initialized successfully");
        Ok(state)
    }

    /// Wires services around an existing pool. Migrations are the caller's
    /// responsibility.
    pub fn from_pool(config: Config, db_pool: PgPool) -> Self {
        let config = Arc::new(config);
        let tokens = Arc::new(TokenManager::new(&config.auth));

        let profiles = ProfileRepository::new(db_pool.clone());
        let resources = EmergencyResourceRepository::new(db_pool.clone());

        let account_service = Arc::new(AccountService::new(
            AccountRepository::new(db_pool.clone()),
            profiles.clone(),
            tokens.clone(),
            config.auth.bcrypt_cost,
        ));
        let profile_service = Arc::new(ProfileService::new(
            profiles.clone(),
            ProfileUpdateService::new(db_pool.clone()),
            account_service.clone(),
        ));
        let favorite_service = Arc::new(FavoriteService::new(
            FavoriteRepository::new(db_pool.clone()),
            profiles.clone(),
        ));
        let contact_service = Arc::new(ContactService::new(
            ContactRepository::new(db_pool.clone()),
            profiles,
        ));
        let search_service = Arc::new(SearchService::new(
            SearchRepository::new(db_pool.clone()),
            resources.clone(),
            config.search.max_results,
        ));
        let catalog_service = Arc::new(CatalogService::new(
            MedicalIssueRepository::new(db_pool.clone()),
            resources,
        ));

        Self {
            config,
            db_pool,
            tokens,
            account_service,
            profile_service,
            favorite_service,
            contact_service,
            search_service,
            catalog_service,
        }
    }
}

pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| crate::Error::Internal(format!("Migration failed: {}", e)))
}

pub async fn create_db_pool(config: &Config) -> Result<PgPool> {
    tracing::info!("Creating database connection pool...");

    let statement_timeout = config.database.statement_timeout_seconds;
    let lock_timeout = config.database.lock_timeout_seconds;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .min_connections(config.database.pool_min_size)
        .max_connections(config.database.pool_max_size)
        .acquire_timeout(std::time::Duration::from_secs(
            config.database.pool_timeout_seconds,
        ))
        .after_connect(move |conn, _meta| {
            Box::pin(async move {
                // Set statement timeout (max query execution time)
                sqlx::query(&format!("SET statement_timeout = '{}s'", statement_timeout))
                    .execute(&mut *conn)
                    .await?;

                // Set lock timeout (max lock wait time - fail fast)
                sqlx::query(&format!("SET lock_timeout = '{}s'", lock_timeout))
                    .execute(&mut *conn)
                    .await?;

                Ok(())
            })
        })
        .connect(&config.database.url)
        .await
        .map_err(crate::Error::Database)?;

    tracing::info!(
        "Database pool created (min: {}, max: {})",
        config.database.pool_min_size,
        config.database.pool_max_size
    );

    Ok(pool)
}
