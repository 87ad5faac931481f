//! Query builder bound to a single table.
//!
//! A builder is created for exactly one table and one logical statement; the
//! repository context discards it after execution and constructs a fresh one
//! for the next operation. Predicate switches go through [`replace_filters`],
//! which installs a new predicate set instead of editing clauses in place.
//!
//! [`replace_filters`]: QueryBuilder::replace_filters

use crate::query_builder::filter::QueryFilter;
use crate::query_builder::ordering::SortOrder;
use crate::query_builder::select::SelectExpr;
use crate::query_builder::sql_generation::SqlGenerator;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct QueryBuilder {
    table: String,
    selects: Vec<SelectExpr>,
    conditions: Vec<QueryFilter>,
    order_by: Vec<(String, SortOrder)>,
    group_by: Vec<String>,
    limit: Option<i64>,
    offset: Option<i64>,
    distinct: bool,
}

impl QueryBuilder {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            selects: Vec::new(),
            conditions: Vec::new(),
            order_by: Vec::new(),
            group_by: Vec::new(),
            limit: None,
            offset: None,
            distinct: false,
        }
    }

    /// The table this builder is bound to
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Append a select-list entry
    pub fn select(mut self, entry: SelectExpr) -> Self {
        self.selects.push(entry);
        self
    }

    /// Add a filter condition
    pub fn filter(mut self, filter: QueryFilter) -> Self {
        self.conditions.push(filter);
        self
    }

    /// Add multiple filters (combined with AND)
    pub fn filters(mut self, filters: Vec<QueryFilter>) -> Self {
        self.conditions.extend(filters);
        self
    }

    /// Discard the current predicate set and install a new one
    pub fn replace_filters(mut self, filters: Vec<QueryFilter>) -> Self {
        self.conditions = filters;
        self
    }

    /// Whether any predicate is currently installed
    pub fn has_conditions(&self) -> bool {
        !self.conditions.is_empty()
    }

    /// The current predicate set
    pub fn conditions(&self) -> &[QueryFilter] {
        &self.conditions
    }

    /// Add ordering
    pub fn order_by(mut self, column: &str, order: SortOrder) -> Self {
        self.order_by.push((column.to_string(), order));
        self
    }

    /// Add grouping
    pub fn group_by(mut self, column: &str) -> Self {
        self.group_by.push(column.to_string());
        self
    }

    /// Add limit
    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Add offset
    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Request duplicate-row elimination on reads
    pub fn distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    /// Render a SELECT statement with its bind values
    pub fn build_select(&self) -> (String, Vec<Value>) {
        let select_clause = SqlGenerator::build_select_clause(&self.selects, self.distinct);
        let (where_clause, values) = SqlGenerator::build_where_clause(&self.conditions);
        let group_clause = SqlGenerator::build_group_clause(&self.group_by);
        let order_clause = SqlGenerator::build_order_clause(&self.order_by);
        let limit_clause = SqlGenerator::build_limit_clause(self.limit, self.offset);

        let mut sql = String::with_capacity(
            select_clause.len()
                + self.table.len()
                + where_clause.len()
                + group_clause.len()
                + order_clause.len()
                + limit_clause.len()
                + 16,
        );
        sql.push_str(&select_clause);
        sql.push_str(" FROM ");
        sql.push_str(&self.table);
        for clause in [&where_clause, &group_clause, &order_clause, &limit_clause] {
            if !clause.is_empty() {
                sql.push(' ');
                sql.push_str(clause);
            }
        }

        (sql, values)
    }

    /// Render an INSERT statement for the given field values.
    /// An empty field list inserts a row of column defaults.
    pub fn build_insert(&self, data: &[(String, Value)]) -> (String, Vec<Value>) {
        if data.is_empty() {
            return (format!("INSERT INTO {} DEFAULT VALUES", self.table), Vec::new());
        }

        let (columns, placeholders, values) = SqlGenerator::build_insert_lists(data);
        (
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                self.table, columns, placeholders
            ),
            values,
        )
    }

    /// Render an UPDATE statement: SET list first, then the builder's
    /// predicates with placeholder numbering continuing after the SET values.
    pub fn build_update(&self, data: &[(String, Value)]) -> (String, Vec<Value>) {
        let mut param_counter = 1;
        let (set_clause, mut values) = SqlGenerator::build_set_clause(data, &mut param_counter);
        let where_clause =
            SqlGenerator::build_where_clause_from(&self.conditions, &mut values, &mut param_counter);

        let mut sql = format!("UPDATE {} SET {}", self.table, set_clause);
        if !where_clause.is_empty() {
            sql.push(' ');
            sql.push_str(&where_clause);
        }

        (sql, values)
    }

    /// Render a DELETE statement for the builder's predicates
    pub fn build_delete(&self) -> (String, Vec<Value>) {
        let (where_clause, values) = SqlGenerator::build_where_clause(&self.conditions);

        let mut sql = format!("DELETE FROM {}", self.table);
        if !where_clause.is_empty() {
            sql.push(' ');
            sql.push_str(&where_clause);
        }

        (sql, values)
    }

    /// Render a TRUNCATE statement; predicates are ignored by design
    pub fn build_truncate(&self) -> String {
        format!("TRUNCATE TABLE {}", self.table)
    }
}
