//! # Tabula
//!
//! A data-access layer for PostgreSQL that decodes compact, string-encoded
//! filter/order/group parameters — the kind that arrive on an HTTP query
//! string — into SQL, and wraps mutating statements in transactional,
//! guarded execution: updates and deletes refuse to touch the whole table
//! unless the caller explicitly forces it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tabula::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::from_file("tabula.toml")?;
//!     let tabula = Tabula::new(config).await?;
//!
//!     let mut users = tabula.repository(RepositoryDefaults::new("users", "default"));
//!
//!     // `age` >= 18, newest first, bounded by an explicit limit
//!     let adults = users
//!         .find(
//!             FindParams::new()
//!                 .filter("age", "gte|18")
//!                 .order(OrderParam::keyed("created_at", "desc"))
//!                 .limit(50),
//!         )
//!         .await?;
//!     println!("{} matching rows", adults.len());
//!
//!     users
//!         .create(
//!             vec![
//!                 ("name".to_string(), json!("Ann")),
//!                 ("age".to_string(), json!(30)),
//!             ],
//!             false,
//!         )
//!         .await?;
//!
//!     // equality predicate is mandatory: an empty where aborts the update
//!     users
//!         .update(
//!             vec![("age".to_string(), json!(31))],
//!             vec![("name".to_string(), json!("Ann"))],
//!             false,
//!             false,
//!         )
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod errors;
pub mod prelude;

// Re-export the main public types for convenience
pub use core::Tabula;
pub use errors::TabulaError;

// Re-export centralized config
pub use config::{AppConfig, ConfigError, DatabaseConfig, RepositoryConfig};

// Re-export the core crate and its main surface
pub use param_query;
pub use param_query::{
    ConnectionRegistry, ConnectionResolver, FieldValues, FilterValue, FindParams, OrderParam,
    QueryBuilder, QueryFilter, QueryOperator, RepoError, Repository, RepositoryContext,
    RepositoryDefaults, RepositorySettings, SelectExpr, Separators, SortOrder, TableRepository,
};

// Re-export external dependencies used in public API
pub use async_trait;
pub use sqlx;
