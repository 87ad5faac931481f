//! Param Query — the core of the Tabula data-access layer.
//!
//! This crate decodes compact string-encoded filter/order/group parameters
//! (`gte|18`, `in|1;2;null`, `name|desc`) into SQL predicates, assembles
//! them into bounded SELECT statements, and wraps create/update/delete/
//! truncate in transactional execution guarded against accidental
//! whole-table effects.

mod bind;

pub mod errors;
pub mod naming;
pub mod params;
pub mod prelude;
pub mod query_builder;
pub mod registry;
pub mod repository;
pub mod row;

pub use errors::RepoError;
pub use params::{DecodedFilter, FilterValue, OrderParam, Separators};
pub use query_builder::{QueryBuilder, QueryFilter, QueryOperator, SelectExpr, SortOrder};
pub use registry::{ConnectionRegistry, ConnectionResolver};
pub use repository::{
    FieldValues, FindParams, Repository, RepositoryContext, RepositoryDefaults,
    RepositorySettings, TableRepository,
};

use sqlx::PgPool;

pub type DbPool = PgPool;
