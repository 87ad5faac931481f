//! Repository context: names, connection handle and builder lifecycle.

use crate::errors::RepoError;
use crate::naming;
use crate::params::Separators;
use crate::query_builder::QueryBuilder;
use crate::registry::ConnectionResolver;
use sqlx::PgPool;
use std::sync::Arc;

/// Tunables for the parameter DSL and read bounds
#[derive(Debug, Clone)]
pub struct RepositorySettings {
    pub separators: Separators,
    /// Applied when a find is issued without an explicit limit; reads are
    /// never unbounded by default.
    pub default_limit: i64,
    pub default_offset: i64,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            separators: Separators::default(),
            default_limit: 10,
            default_offset: 0,
        }
    }
}

/// Explicit table/connection defaults for one repository.
///
/// [`for_type`] derives both from a type's fully-qualified name — the final
/// path segment snake-cased names the table, the parent segment names the
/// connection — via the pure helpers in [`crate::naming`].
///
/// [`for_type`]: RepositoryDefaults::for_type
#[derive(Debug, Clone)]
pub struct RepositoryDefaults {
    pub table_name: String,
    pub connection_name: String,
}

impl RepositoryDefaults {
    pub fn new(table_name: impl Into<String>, connection_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            connection_name: connection_name.into(),
        }
    }

    pub fn for_type<T: ?Sized>() -> Self {
        let type_path = std::any::type_name::<T>();
        Self {
            table_name: naming::default_table_name(type_path),
            connection_name: naming::default_connection_name(type_path),
        }
    }
}

/// Per-repository bundle of table name, connection name/handle and the live
/// query builder.
///
/// The connection and the builder are created lazily; a builder, once
/// created, is bound to exactly one table and connection, lives for one
/// logical statement, and is taken out of the context when that statement
/// executes. A context is owned by one in-flight operation at a time — all
/// operations take `&mut self`.
pub struct RepositoryContext {
    resolver: Arc<dyn ConnectionResolver>,
    defaults: RepositoryDefaults,
    settings: RepositorySettings,
    table_name: Option<String>,
    connection_name: Option<String>,
    connection: Option<PgPool>,
    builder: Option<QueryBuilder>,
}

impl std::fmt::Debug for RepositoryContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryContext")
            .field("resolver", &"<dyn ConnectionResolver>")
            .field("defaults", &self.defaults)
            .field("settings", &self.settings)
            .field("table_name", &self.table_name)
            .field("connection_name", &self.connection_name)
            .field("connection", &self.connection)
            .field("builder", &self.builder)
            .finish()
    }
}

impl RepositoryContext {
    pub fn new(resolver: Arc<dyn ConnectionResolver>, defaults: RepositoryDefaults) -> Self {
        Self::with_settings(resolver, defaults, RepositorySettings::default())
    }

    pub fn with_settings(
        resolver: Arc<dyn ConnectionResolver>,
        defaults: RepositoryDefaults,
        settings: RepositorySettings,
    ) -> Self {
        Self {
            resolver,
            defaults,
            settings,
            table_name: None,
            connection_name: None,
            connection: None,
            builder: None,
        }
    }

    pub fn settings(&self) -> &RepositorySettings {
        &self.settings
    }

    pub fn table_name(&self) -> Option<&str> {
        self.table_name.as_deref()
    }

    pub fn set_table_name(&mut self, table_name: impl Into<String>) -> &mut Self {
        self.table_name = Some(table_name.into());
        self
    }

    pub fn connection_name(&self) -> Option<&str> {
        self.connection_name.as_deref()
    }

    /// Set the connection name and resolve its pool handle immediately
    pub fn set_connection_name(&mut self, connection_name: &str) -> Result<&mut Self, RepoError> {
        let pool = self
            .resolver
            .resolve(connection_name)
            .ok_or_else(|| RepoError::UnknownConnection(connection_name.to_string()))?;

        self.connection_name = Some(connection_name.to_string());
        self.connection = Some(pool);
        Ok(self)
    }

    pub fn connection(&self) -> Option<&PgPool> {
        self.connection.as_ref()
    }

    /// Construct the query builder, resolving connection and table first.
    ///
    /// Explicit arguments override the context's current names; otherwise an
    /// already-resolved name is kept and an unresolved one falls back to the
    /// configured defaults.
    pub fn create_builder(
        &mut self,
        table_name: Option<&str>,
        connection_name: Option<&str>,
    ) -> Result<&mut Self, RepoError> {
        if let Some(name) = connection_name {
            self.set_connection_name(name)?;
        }
        if self.connection.is_none() {
            let name = self
                .connection_name
                .clone()
                .unwrap_or_else(|| self.defaults.connection_name.clone());
            self.set_connection_name(&name)?;
        }

        if let Some(name) = table_name {
            self.set_table_name(name);
        }
        let table = match &self.table_name {
            Some(table) => table.clone(),
            None => {
                self.table_name = Some(self.defaults.table_name.clone());
                self.defaults.table_name.clone()
            }
        };

        tracing::debug!(table = %table, connection = ?self.connection_name, "creating query builder");
        self.builder = Some(QueryBuilder::new(table));
        Ok(self)
    }

    /// Create the builder only when none exists yet
    pub fn ensure_builder(&mut self) -> Result<&mut Self, RepoError> {
        if self.builder.is_none() {
            self.create_builder(None, None)?;
        }
        Ok(self)
    }

    pub fn builder(&self) -> Option<&QueryBuilder> {
        self.builder.as_ref()
    }

    /// Take the builder out for execution; the next operation starts from a
    /// freshly created one.
    pub(crate) fn take_builder(&mut self) -> Result<QueryBuilder, RepoError> {
        self.builder.take().ok_or(RepoError::MissingBuilder)
    }

    /// Rebuild the builder in place through a consuming transform
    pub(crate) fn update_builder(&mut self, transform: impl FnOnce(QueryBuilder) -> QueryBuilder) {
        self.builder = self.builder.take().map(transform);
    }

    pub(crate) fn require_connection(&self) -> Result<PgPool, RepoError> {
        self.connection.clone().ok_or(RepoError::MissingConnection)
    }
}
