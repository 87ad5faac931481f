//! The compact filter/order parameter DSL.
//!
//! Filters arrive as strings of the shape `token|value` (`gte|18`,
//! `like|%foo%`, `in|1;2;3`, `null|true`); a string without the separator is
//! a plain equality value. Order entries are either positional (the value
//! names the column) or keyed by column with a direction string, which may
//! itself embed `column|direction`. Decoding never fails: unknown tokens
//! fall back to the default operator with the post-separator substring as
//! the value.

use crate::query_builder::{QueryOperator, SortOrder};
use serde_json::Value;

/// Separator characters for the parameter DSL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Separators {
    /// Splits a filter string into token and value (`gte|18`)
    pub parameter: char,
    /// Splits the value of an `in` filter into list entries (`1;2;3`)
    pub list: char,
}

impl Default for Separators {
    fn default() -> Self {
        Self {
            parameter: '|',
            list: ';',
        }
    }
}

/// Raw filter input for one column: a single encoded string or several,
/// applied as conjunctions in the order given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Single(String),
    Many(Vec<String>),
}

impl FilterValue {
    /// View the one-or-many shape as a slice
    pub fn as_slice(&self) -> &[String] {
        match self {
            FilterValue::Single(value) => std::slice::from_ref(value),
            FilterValue::Many(values) => values.as_slice(),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Single(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Single(value)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(values: Vec<String>) -> Self {
        FilterValue::Many(values)
    }
}

impl From<Vec<&str>> for FilterValue {
    fn from(values: Vec<&str>) -> Self {
        FilterValue::Many(values.into_iter().map(str::to_string).collect())
    }
}

/// Decoded form of one filter string
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedFilter {
    /// `column <operator> value`
    Comparison {
        operator: QueryOperator,
        value: String,
    },
    /// `IS NULL` when the value was `true`, `IS NOT NULL` otherwise
    Null { is_null: bool },
    /// `IN` over an ordered list of literals
    List { values: Vec<String> },
}

/// Decode a single filter string.
///
/// The string is split on the first occurrence of the parameter separator;
/// the token half is matched case-insensitively against the operator table.
/// `in` re-splits the value on the list separator; `null` keys off the value
/// `true`. A missing or unknown token yields `default_operator` with the
/// remaining text as the value.
pub fn decode_filter(
    raw: &str,
    default_operator: QueryOperator,
    separators: &Separators,
) -> DecodedFilter {
    let Some((token, value)) = raw.split_once(separators.parameter) else {
        return DecodedFilter::Comparison {
            operator: default_operator,
            value: raw.to_string(),
        };
    };

    let token = token.to_ascii_lowercase();
    match token.as_str() {
        "in" => DecodedFilter::List {
            values: value
                .split(separators.list)
                .map(str::to_string)
                .collect(),
        },
        "null" => DecodedFilter::Null {
            is_null: value == "true",
        },
        _ => DecodedFilter::Comparison {
            operator: QueryOperator::from_token(&token).unwrap_or(default_operator),
            value: value.to_string(),
        },
    }
}

/// An order entry, preserving the caller's positional-or-keyed shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderParam {
    /// Positional entry: the value itself names the column
    Positional(String),
    /// Keyed entry: column with an explicit direction string
    Keyed { column: String, direction: String },
}

impl OrderParam {
    pub fn positional(column: impl Into<String>) -> Self {
        OrderParam::Positional(column.into())
    }

    pub fn keyed(column: impl Into<String>, direction: impl Into<String>) -> Self {
        OrderParam::Keyed {
            column: column.into(),
            direction: direction.into(),
        }
    }
}

/// Decode one order entry into `(column, direction)`.
///
/// A direction string containing the parameter separator embeds its own
/// `column|direction` pair and overrides the previously chosen column; this
/// applies to positional entries too. Only a case-insensitive `desc` sorts
/// descending, everything else is ascending.
pub fn decode_order(param: &OrderParam, separators: &Separators) -> (String, SortOrder) {
    let (mut column, direction) = match param {
        OrderParam::Positional(value) => (value.clone(), value.clone()),
        OrderParam::Keyed { column, direction } => (column.clone(), direction.clone()),
    };

    let direction = match direction.split_once(separators.parameter) {
        Some((embedded_column, direction)) => {
            column = embedded_column.to_string();
            direction.to_string()
        }
        None => direction,
    };

    let order = if direction.eq_ignore_ascii_case("desc") {
        SortOrder::Desc
    } else {
        SortOrder::Asc
    };

    (column, order)
}

/// Coerce a decoded literal into a typed bind value.
///
/// The DSL carries every literal as text, but PostgreSQL parameters are
/// typed: integers, finite floats and booleans are recognized before
/// falling back to a string bind.
pub fn coerce_literal(raw: &str) -> Value {
    if let Ok(int) = raw.parse::<i64>() {
        return Value::from(int);
    }
    if let Ok(float) = raw.parse::<f64>() {
        if float.is_finite() {
            return Value::from(float);
        }
    }
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(raw.to_string()),
    }
}
