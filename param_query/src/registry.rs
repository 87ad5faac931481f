//! Named connection resolution.
//!
//! Repositories refer to their database by name; resolving a name to a pool
//! handle is an external concern behind the [`ConnectionResolver`] trait.
//! [`ConnectionRegistry`] is the plain map implementation used by the
//! coordinator crate and by tests.

use crate::errors::RepoError;
use sqlx::PgPool;
use std::collections::HashMap;

/// Resolve a connection name to a pool handle, if one is registered
pub trait ConnectionResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Option<PgPool>;
}

#[derive(Default, Clone)]
pub struct ConnectionRegistry {
    pools: HashMap<String, PgPool>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pool under a name; names are unique
    pub fn register(&mut self, name: impl Into<String>, pool: PgPool) -> Result<(), RepoError> {
        let name = name.into();
        if self.pools.contains_key(&name) {
            return Err(RepoError::ConnectionAlreadyRegistered(name));
        }

        self.pools.insert(name, pool);
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Option<PgPool> {
        self.pools.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        self.pools.keys().map(String::as_str).collect()
    }
}

impl ConnectionResolver for ConnectionRegistry {
    fn resolve(&self, name: &str) -> Option<PgPool> {
        ConnectionRegistry::resolve(self, name)
    }
}
