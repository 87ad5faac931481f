//! Predicate conditions and the filter-token operator table.

use serde_json::Value;

/// Comparison operators accepted by the query builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOperator {
    Eq,        // =
    Ne,        // !=
    Gt,        // >
    Gte,       // >=
    Lt,        // <
    Lte,       // <=
    Like,      // LIKE
    In,        // IN
    IsNull,    // IS NULL
    IsNotNull, // IS NOT NULL
}

impl QueryOperator {
    /// Look up a short filter token (`neq`, `lt`, `like`, ...) in the
    /// operator table. Unknown tokens return `None`; callers fall back to
    /// their default operator rather than failing.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "neq" => Some(QueryOperator::Ne),
            "lt" => Some(QueryOperator::Lt),
            "lte" => Some(QueryOperator::Lte),
            "gt" => Some(QueryOperator::Gt),
            "gte" => Some(QueryOperator::Gte),
            "like" => Some(QueryOperator::Like),
            "in" => Some(QueryOperator::In),
            _ => None,
        }
    }

    /// Convert the operator to its SQL spelling
    pub fn as_sql(&self) -> &'static str {
        match self {
            QueryOperator::Eq => "=",
            QueryOperator::Ne => "!=",
            QueryOperator::Gt => ">",
            QueryOperator::Gte => ">=",
            QueryOperator::Lt => "<",
            QueryOperator::Lte => "<=",
            QueryOperator::Like => "LIKE",
            QueryOperator::In => "IN",
            QueryOperator::IsNull => "IS NULL",
            QueryOperator::IsNotNull => "IS NOT NULL",
        }
    }
}

/// Single condition in a WHERE clause
#[derive(Debug, Clone, PartialEq)]
pub struct QueryCondition {
    pub column: String,
    pub operator: QueryOperator,
    pub value: Option<Value>, // None for IS NULL / IS NOT NULL
}

/// Logical operators for combining conditions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
}

/// Query filter that can be nested
#[derive(Debug, Clone, PartialEq)]
pub enum QueryFilter {
    Condition(QueryCondition),
    Group {
        operator: LogicalOperator,
        filters: Vec<QueryFilter>,
    },
}

impl QueryFilter {
    /// Create a simple condition
    pub fn condition(column: &str, operator: QueryOperator, value: Option<Value>) -> Self {
        Self::Condition(QueryCondition {
            column: column.to_string(),
            operator,
            value,
        })
    }

    /// Create AND group
    pub fn and(filters: Vec<QueryFilter>) -> Self {
        Self::Group {
            operator: LogicalOperator::And,
            filters,
        }
    }

    /// Create OR group
    pub fn or(filters: Vec<QueryFilter>) -> Self {
        Self::Group {
            operator: LogicalOperator::Or,
            filters,
        }
    }

    /// Equality condition
    pub fn eq(column: &str, value: Value) -> Self {
        Self::condition(column, QueryOperator::Eq, Some(value))
    }

    /// Not-equal condition
    pub fn ne(column: &str, value: Value) -> Self {
        Self::condition(column, QueryOperator::Ne, Some(value))
    }

    /// Greater-than condition
    pub fn gt(column: &str, value: Value) -> Self {
        Self::condition(column, QueryOperator::Gt, Some(value))
    }

    /// Greater-than-or-equal condition
    pub fn gte(column: &str, value: Value) -> Self {
        Self::condition(column, QueryOperator::Gte, Some(value))
    }

    /// Less-than condition
    pub fn lt(column: &str, value: Value) -> Self {
        Self::condition(column, QueryOperator::Lt, Some(value))
    }

    /// Less-than-or-equal condition
    pub fn lte(column: &str, value: Value) -> Self {
        Self::condition(column, QueryOperator::Lte, Some(value))
    }

    /// LIKE condition
    pub fn like(column: &str, pattern: &str) -> Self {
        Self::condition(
            column,
            QueryOperator::Like,
            Some(Value::String(pattern.to_string())),
        )
    }

    /// IN condition over a list of literals
    pub fn in_values(column: &str, values: Vec<Value>) -> Self {
        Self::condition(column, QueryOperator::In, Some(Value::Array(values)))
    }

    /// IS NULL condition
    pub fn is_null(column: &str) -> Self {
        Self::condition(column, QueryOperator::IsNull, None)
    }

    /// IS NOT NULL condition
    pub fn is_not_null(column: &str) -> Self {
        Self::condition(column, QueryOperator::IsNotNull, None)
    }
}
