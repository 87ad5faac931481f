//! Core Tabula functionality
//!
//! The coordinator builds one connection pool per configured named
//! connection, acts as the connection resolver for repositories, and hands
//! out repository contexts wired to its registry and settings.

use std::sync::Arc;
use std::time::Duration;

use config::{AppConfig, DatabaseConfig, RepositoryConfig};
use param_query::params::Separators;
use param_query::registry::ConnectionRegistry;
use param_query::repository::{
    RepositoryContext, RepositoryDefaults, RepositorySettings, TableRepository,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::errors::TabulaError;

/// Coordinator owning the named connection pools and repository settings
pub struct Tabula {
    registry: Arc<ConnectionRegistry>,
    settings: RepositorySettings,
}

impl Tabula {
    /// Connect every configured named connection and build the registry
    pub async fn new(config: AppConfig) -> Result<Self, TabulaError> {
        config.validate()?;

        let mut registry = ConnectionRegistry::new();
        for (name, database) in &config.connections {
            let pool = connect(database).await?;
            tracing::debug!(connection = %name, "registered connection pool");
            registry.register(name.clone(), pool)?;
        }

        Ok(Self {
            registry: Arc::new(registry),
            settings: repository_settings(&config.repository),
        })
    }

    /// Like [`Tabula::new`] but pools dial out on first use
    pub fn connect_lazy(config: AppConfig) -> Result<Self, TabulaError> {
        config.validate()?;

        let mut registry = ConnectionRegistry::new();
        for (name, database) in &config.connections {
            let pool = pool_options(database).connect_lazy(&database.connection_string())?;
            registry.register(name.clone(), pool)?;
        }

        Ok(Self {
            registry: Arc::new(registry),
            settings: repository_settings(&config.repository),
        })
    }

    /// Build a coordinator around an existing registry; pools registered by
    /// the caller stay under the caller's lifecycle management.
    pub fn with_registry(registry: ConnectionRegistry, settings: RepositorySettings) -> Self {
        Self {
            registry: Arc::new(registry),
            settings,
        }
    }

    /// Resolver handle for wiring custom repository contexts
    pub fn resolver(&self) -> Arc<ConnectionRegistry> {
        self.registry.clone()
    }

    /// Repository context with explicit defaults, for custom
    /// [`Repository`](param_query::Repository) implementations
    pub fn context(&self, defaults: RepositoryDefaults) -> RepositoryContext {
        RepositoryContext::with_settings(self.registry.clone(), defaults, self.settings.clone())
    }

    /// Plain repository with explicit table/connection defaults
    pub fn repository(&self, defaults: RepositoryDefaults) -> TableRepository {
        TableRepository::new(self.context(defaults))
    }

    /// Plain repository whose defaults derive from `T`'s type path
    pub fn repository_for<T: ?Sized>(&self) -> TableRepository {
        self.repository(RepositoryDefaults::for_type::<T>())
    }

    /// Registered connection names
    pub fn connection_names(&self) -> Vec<&str> {
        self.registry.names()
    }

    /// Check every registered connection
    pub async fn health_check(&self) -> Result<(), TabulaError> {
        for name in self.registry.names() {
            if let Some(pool) = self.registry.resolve(name) {
                sqlx::query("SELECT 1").fetch_one(&pool).await?;
            }
        }
        Ok(())
    }
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    let mut options = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds));

    if config.max_lifetime_seconds > 0 {
        options = options.max_lifetime(Duration::from_secs(config.max_lifetime_seconds));
    }

    options
}

async fn connect(config: &DatabaseConfig) -> Result<PgPool, TabulaError> {
    Ok(pool_options(config)
        .connect(&config.connection_string())
        .await?)
}

fn repository_settings(config: &RepositoryConfig) -> RepositorySettings {
    RepositorySettings {
        separators: Separators {
            parameter: config.parameter_separator_char(),
            list: config.list_separator_char(),
        },
        default_limit: config.default_limit,
        default_offset: config.default_offset,
    }
}
