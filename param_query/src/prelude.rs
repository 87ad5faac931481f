//! Convenience re-exports for common param-query usage

pub use crate::errors::RepoError;
pub use crate::params::{DecodedFilter, FilterValue, OrderParam, Separators};
pub use crate::query_builder::{
    QueryBuilder, QueryFilter, QueryOperator, SelectExpr, SortOrder,
};
pub use crate::registry::{ConnectionRegistry, ConnectionResolver};
pub use crate::repository::{
    FieldValues, FindParams, Repository, RepositoryContext, RepositoryDefaults,
    RepositorySettings, TableRepository,
};

// Common external dependencies that are frequently used
pub use async_trait::async_trait;
pub use serde_json::{json, Value};
pub use sqlx::PgPool;
