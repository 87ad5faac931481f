//! Error types for the Tabula crate

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TabulaError {
    #[error("Database connection error: {0}")]
    DatabaseConnection(#[from] sqlx::Error),

    #[error("Invalid configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Repository(#[from] param_query::RepoError),
}
