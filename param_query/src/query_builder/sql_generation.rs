//! SQL text generation for the query builder.
//!
//! Clauses are rendered with `$N` placeholders; the collected parameter
//! values are returned alongside the text and bound at execution time.

use crate::query_builder::filter::{LogicalOperator, QueryCondition, QueryFilter, QueryOperator};
use crate::query_builder::ordering::SortOrder;
use crate::query_builder::select::SelectExpr;
use serde_json::Value;

pub struct SqlGenerator;

impl SqlGenerator {
    /// Build a SELECT list from the given entries; an empty list falls back
    /// to the bare wildcard.
    pub fn build_select_clause(selects: &[SelectExpr], distinct: bool) -> String {
        let columns = if selects.is_empty() {
            "*".to_string()
        } else {
            selects
                .iter()
                .map(|entry| match entry {
                    SelectExpr::Column(name) => name.as_str(),
                    SelectExpr::Raw(expr) => expr.as_str(),
                })
                .collect::<Vec<_>>()
                .join(", ")
        };

        if distinct {
            format!("SELECT DISTINCT {}", columns)
        } else {
            format!("SELECT {}", columns)
        }
    }

    /// Build a WHERE clause from conditions, numbering placeholders from `$1`
    pub fn build_where_clause(conditions: &[QueryFilter]) -> (String, Vec<Value>) {
        let mut values = Vec::new();
        let mut param_counter = 1;
        let clause = Self::build_where_clause_from(conditions, &mut values, &mut param_counter);
        (clause, values)
    }

    /// Build a WHERE clause continuing an existing placeholder numbering.
    /// Used by UPDATE statements where the SET list claims the first `$N`s.
    pub fn build_where_clause_from(
        conditions: &[QueryFilter],
        values: &mut Vec<Value>,
        param_counter: &mut i32,
    ) -> String {
        if conditions.is_empty() {
            return String::new();
        }

        let conditions_sql = conditions
            .iter()
            .map(|condition| Self::build_condition_sql(condition, values, param_counter))
            .collect::<Vec<_>>()
            .join(" AND ");

        if conditions_sql.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions_sql)
        }
    }

    fn build_condition_sql(
        filter: &QueryFilter,
        values: &mut Vec<Value>,
        param_counter: &mut i32,
    ) -> String {
        match filter {
            QueryFilter::Condition(condition) => {
                Self::build_single_condition_sql(condition, values, param_counter)
            }
            QueryFilter::Group { operator, filters } => {
                let operator_str = match operator {
                    LogicalOperator::And => " AND ",
                    LogicalOperator::Or => " OR ",
                };

                let group_conditions = filters
                    .iter()
                    .map(|f| Self::build_condition_sql(f, values, param_counter))
                    .collect::<Vec<_>>()
                    .join(operator_str);

                format!("({})", group_conditions)
            }
        }
    }

    fn build_single_condition_sql(
        condition: &QueryCondition,
        values: &mut Vec<Value>,
        param_counter: &mut i32,
    ) -> String {
        let column = &condition.column;

        match &condition.operator {
            QueryOperator::IsNull => format!("{} IS NULL", column),
            QueryOperator::IsNotNull => format!("{} IS NOT NULL", column),
            QueryOperator::In => {
                if let Some(Value::Array(list)) = &condition.value {
                    if list.is_empty() {
                        // IN () is invalid SQL; an empty list matches nothing
                        return "1=0".to_string();
                    }

                    let placeholders: Vec<String> = list
                        .iter()
                        .map(|_| {
                            let param = format!("${}", param_counter);
                            *param_counter += 1;
                            param
                        })
                        .collect();

                    values.extend(list.clone());
                    format!("{} IN ({})", column, placeholders.join(", "))
                } else {
                    "1=0".to_string()
                }
            }
            operator => {
                if let Some(value) = &condition.value {
                    values.push(value.clone());
                    let param = format!("${}", param_counter);
                    *param_counter += 1;
                    format!("{} {} {}", column, operator.as_sql(), param)
                } else {
                    "1=0".to_string()
                }
            }
        }
    }

    /// Build an ORDER BY clause
    pub fn build_order_clause(order_by: &[(String, SortOrder)]) -> String {
        if order_by.is_empty() {
            return String::new();
        }

        let order_items: Vec<String> = order_by
            .iter()
            .map(|(column, order)| format!("{} {}", column, order.as_sql()))
            .collect();

        format!("ORDER BY {}", order_items.join(", "))
    }

    /// Build a GROUP BY clause
    pub fn build_group_clause(group_by: &[String]) -> String {
        if group_by.is_empty() {
            return String::new();
        }

        format!("GROUP BY {}", group_by.join(", "))
    }

    /// Build a LIMIT/OFFSET clause
    pub fn build_limit_clause(limit: Option<i64>, offset: Option<i64>) -> String {
        let mut clauses = Vec::new();

        if let Some(limit) = limit {
            clauses.push(format!("LIMIT {}", limit));
        }

        if let Some(offset) = offset {
            clauses.push(format!("OFFSET {}", offset));
        }

        clauses.join(" ")
    }

    /// Build a SET list for UPDATE, claiming placeholders `$1..$n`
    pub fn build_set_clause(data: &[(String, Value)], param_counter: &mut i32) -> (String, Vec<Value>) {
        let mut values = Vec::with_capacity(data.len());

        let assignments: Vec<String> = data
            .iter()
            .map(|(column, value)| {
                values.push(value.clone());
                let assignment = format!("{} = ${}", column, param_counter);
                *param_counter += 1;
                assignment
            })
            .collect();

        (assignments.join(", "), values)
    }

    /// Build a column/placeholder pair for INSERT
    pub fn build_insert_lists(data: &[(String, Value)]) -> (String, String, Vec<Value>) {
        let mut values = Vec::with_capacity(data.len());

        let columns: Vec<&str> = data.iter().map(|(column, _)| column.as_str()).collect();
        let placeholders: Vec<String> = data
            .iter()
            .enumerate()
            .map(|(index, (_, value))| {
                values.push(value.clone());
                format!("${}", index + 1)
            })
            .collect();

        (columns.join(", "), placeholders.join(", "), values)
    }
}
