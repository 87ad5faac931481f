use thiserror::Error;

/// Default message for [`RepoError::EmptyWhereClause`]
pub const EMPTY_WHERE_CLAUSE_MESSAGE: &str =
    "cannot run a mutating query without any where clause";

#[derive(Error, Debug)]
pub enum RepoError {
    /// A mutating operation would have applied to every row of the table
    /// and the caller did not opt in with `force_empty_where`. Always
    /// signals an aborted transaction.
    #[error("{message}")]
    EmptyWhereClause { message: String },

    /// `first`/`find_by_id` matched no row and the caller did not opt into
    /// a nullable result.
    #[error("{message}")]
    QueryNotFound { message: String },

    #[error("connection '{0}' is not registered")]
    UnknownConnection(String),

    #[error("connection '{0}' is already registered")]
    ConnectionAlreadyRegistered(String),

    #[error("repository has no resolved connection")]
    MissingConnection,

    #[error("no query builder has been created for this repository")]
    MissingBuilder,

    #[error("database error on table '{table}': {source}")]
    Database {
        table: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("failed to decode column '{column}': {source}")]
    RowDecode {
        column: String,
        #[source]
        source: sqlx::Error,
    },
}

impl RepoError {
    /// Empty-where violation with the default message
    pub fn empty_where_clause() -> Self {
        Self::EmptyWhereClause {
            message: EMPTY_WHERE_CLAUSE_MESSAGE.to_string(),
        }
    }

    /// Empty-where violation with a caller-supplied message
    pub fn empty_where_clause_message(message: impl Into<String>) -> Self {
        Self::EmptyWhereClause {
            message: message.into(),
        }
    }

    /// Not-found with the default message for the given table
    pub fn query_not_found(table: &str) -> Self {
        Self::QueryNotFound {
            message: format!("no records found in '{}' for the given parameters", table),
        }
    }

    /// Not-found with a caller-supplied message
    pub fn query_not_found_message(message: impl Into<String>) -> Self {
        Self::QueryNotFound {
            message: message.into(),
        }
    }

    pub fn database(table: &str, source: sqlx::Error) -> Self {
        Self::Database {
            table: table.to_string(),
            source,
        }
    }

    pub fn row_decode(column: &str, source: sqlx::Error) -> Self {
        Self::RowDecode {
            column: column.to_string(),
            source,
        }
    }
}
