//! Query assembly: turning decoded parameters into builder state.
//!
//! Bare column names are qualified with the context's table before they
//! reach the builder; multiple filters on one column land as conjunctions
//! in encounter order. Orders and groups are appended first-listed,
//! first-applied, giving a stable multi-key precedence.

use crate::params::{self, DecodedFilter, FilterValue, OrderParam};
use crate::query_builder::{QueryFilter, QueryOperator, SelectExpr};
use crate::repository::context::RepositoryContext;
use serde_json::Value;

impl RepositoryContext {
    /// Prefix a bare column with the context's table name; columns that
    /// already carry a qualifier pass through unchanged.
    pub fn qualify_column(&self, column: &str) -> String {
        if column.contains('.') {
            return column.to_string();
        }

        match self.table_name() {
            Some(table) => format!("{}.{}", table, column),
            None => column.to_string(),
        }
    }

    /// Append select-list entries, qualifying bare columns. `Raw` entries
    /// pass through unmodified.
    pub fn add_selects(&mut self, selects: Vec<SelectExpr>) -> &mut Self {
        let entries: Vec<SelectExpr> = selects
            .into_iter()
            .map(|entry| match entry {
                SelectExpr::Column(name) => SelectExpr::Column(self.qualify_column(&name)),
                raw => raw,
            })
            .collect();

        self.update_builder(|builder| {
            entries
                .into_iter()
                .fold(builder, |builder, entry| builder.select(entry))
        });
        self
    }

    /// Decode every filter string and append one predicate per entry
    pub fn add_wheres(&mut self, wheres: &[(String, FilterValue)]) -> &mut Self {
        for (column, parameter) in wheres {
            let column = self.qualify_column(column);
            for raw in parameter.as_slice() {
                self.push_where_clause(&column, raw);
            }
        }
        self
    }

    fn push_where_clause(&mut self, column: &str, raw: &str) {
        let decoded = params::decode_filter(raw, QueryOperator::Eq, &self.settings().separators);

        let filter = match decoded {
            DecodedFilter::Null { is_null: true } => QueryFilter::is_null(column),
            DecodedFilter::Null { is_null: false } => QueryFilter::is_not_null(column),
            DecodedFilter::List { mut values } => {
                // a `null` literal in the list widens the match to NULL rows
                if let Some(position) = values.iter().position(|v| v == "null") {
                    values.remove(position);
                    QueryFilter::or(vec![
                        QueryFilter::is_null(column),
                        QueryFilter::in_values(column, coerce_all(&values)),
                    ])
                } else {
                    QueryFilter::in_values(column, coerce_all(&values))
                }
            }
            DecodedFilter::Comparison { operator, value } => {
                QueryFilter::condition(column, operator, Some(params::coerce_literal(&value)))
            }
        };

        self.update_builder(|builder| builder.filter(filter));
    }

    /// Append order clauses in the given order
    pub fn add_orders(&mut self, orders: &[OrderParam]) -> &mut Self {
        for param in orders {
            let (column, direction) = params::decode_order(param, &self.settings().separators);
            let column = self.qualify_column(&column);
            self.update_builder(|builder| builder.order_by(&column, direction));
        }
        self
    }

    /// Append group clauses in the given order
    pub fn add_groups(&mut self, groups: &[String]) -> &mut Self {
        for column in groups {
            let column = self.qualify_column(column);
            self.update_builder(|builder| builder.group_by(&column));
        }
        self
    }

    /// Apply the given limit or fall back to the configured default
    pub fn add_limit(&mut self, limit: Option<i64>) -> &mut Self {
        let limit = limit.unwrap_or(self.settings().default_limit);
        self.update_builder(|builder| builder.limit(limit));
        self
    }

    /// Apply the given offset or fall back to the configured default
    pub fn add_offset(&mut self, offset: Option<i64>) -> &mut Self {
        let offset = offset.unwrap_or(self.settings().default_offset);
        self.update_builder(|builder| builder.offset(offset));
        self
    }

    /// Replace the builder's predicate set with equality predicates built
    /// from the given column/value pairs.
    pub fn replace_where_clause(&mut self, wheres: &[(String, Value)]) -> &mut Self {
        let filters: Vec<QueryFilter> = wheres
            .iter()
            .map(|(column, value)| QueryFilter::eq(&self.qualify_column(column), value.clone()))
            .collect();

        self.update_builder(|builder| builder.replace_filters(filters));
        self
    }
}

fn coerce_all(values: &[String]) -> Vec<Value> {
    values.iter().map(|v| params::coerce_literal(v)).collect()
}
