//! Convenience re-exports for common Tabula usage
//!
//! # Example
//!
//! ```rust
//! use tabula::prelude::*;
//! ```

// Core Tabula components
pub use crate::core::Tabula;
pub use crate::errors::TabulaError;

// Re-export centralized config
pub use config::{AppConfig, ConfigError, DatabaseConfig, RepositoryConfig};

// Re-export the core repository surface
pub use param_query::prelude::*;

// Common external dependencies
pub use anyhow;
pub use async_trait;
pub use sqlx;
pub use tokio;
