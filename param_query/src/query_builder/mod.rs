//! SQL query construction.
//!
//! The builder holds a structured description of one statement (selects,
//! predicate tree, ordering, grouping, bounds) and renders it to SQL text
//! with `$N` placeholders plus the values to bind.

pub mod builder;
pub mod filter;
pub mod ordering;
pub mod select;
pub mod sql_generation;


pub use builder::QueryBuilder;
pub use filter::{LogicalOperator, QueryCondition, QueryFilter, QueryOperator};
pub use ordering::SortOrder;
pub use select::SelectExpr;
