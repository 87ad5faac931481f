//! Repository operations: reads and guarded mutations.
//!
//! The trait's default methods carry the whole data flow; implementors only
//! supply the context accessors, and may override the assembly hooks
//! (`default_selects`, `join_tables`, `apply_special_parameters`) when a
//! repository spreads beyond its flat table.

use crate::bind::bind_value;
use crate::errors::RepoError;
use crate::params::{FilterValue, OrderParam};
use crate::query_builder::{QueryBuilder, QueryFilter, SelectExpr};
use crate::repository::context::RepositoryContext;
use crate::row;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

/// Ordered column/value pairs naming the fields of one record
pub type FieldValues = Vec<(String, Value)>;

/// Parameters of a find/first read
#[derive(Debug, Clone)]
pub struct FindParams {
    pub selects: Vec<SelectExpr>,
    pub wheres: Vec<(String, FilterValue)>,
    pub orders: Vec<OrderParam>,
    pub groups: Vec<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub special: Vec<(String, Value)>,
    pub distinct: bool,
}

impl Default for FindParams {
    fn default() -> Self {
        Self {
            selects: Vec::new(),
            wheres: Vec::new(),
            orders: Vec::new(),
            groups: Vec::new(),
            limit: None,
            offset: None,
            special: Vec::new(),
            distinct: true,
        }
    }
}

impl FindParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(mut self, entry: impl Into<SelectExpr>) -> Self {
        self.selects.push(entry.into());
        self
    }

    pub fn filter(mut self, column: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.wheres.push((column.into(), value.into()));
        self
    }

    pub fn order(mut self, param: OrderParam) -> Self {
        self.orders.push(param);
        self
    }

    pub fn group(mut self, column: impl Into<String>) -> Self {
        self.groups.push(column.into());
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn special(mut self, key: impl Into<String>, value: Value) -> Self {
        self.special.push((key.into(), value));
        self
    }

    pub fn distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }
}

/// Data-access operations over one table.
///
/// Every operation lazily creates the query builder from the context's
/// defaults. Mutations run inside a transaction whose commit or rollback is
/// the sole consistency boundary; any error raised inside the transactional
/// body rolls it back and propagates. `update` and `delete` refuse to run
/// with an empty predicate set unless the caller passes `force_empty_where`.
#[async_trait]
pub trait Repository: Send {
    fn context(&self) -> &RepositoryContext;

    fn context_mut(&mut self) -> &mut RepositoryContext;

    /// Select list used when a read passes no explicit selects
    fn default_selects(&self) -> Vec<SelectExpr> {
        match self.context().table_name() {
            Some(table) => vec![SelectExpr::raw(format!("{}.*", table))],
            None => vec![SelectExpr::raw("*")],
        }
    }

    /// Join hook for repositories that spread over more than one table; the
    /// default repository stays on its flat table.
    fn join_tables(&self, builder: QueryBuilder) -> QueryBuilder {
        builder
    }

    /// Hook for caller-defined special parameters; ignored by default
    fn apply_special_parameters(
        &self,
        builder: QueryBuilder,
        _special: &[(String, Value)],
    ) -> QueryBuilder {
        builder
    }

    /// Assemble a find query from the given parameters and hand back the
    /// pool and the finished builder.
    fn prepare_find(&mut self, params: &FindParams) -> Result<(PgPool, QueryBuilder), RepoError> {
        self.context_mut().ensure_builder()?;

        let selects = if params.selects.is_empty() {
            self.default_selects()
        } else {
            params.selects.clone()
        };

        let context = self.context_mut();
        context.add_selects(selects);
        context.add_wheres(&params.wheres);
        context.add_orders(&params.orders);
        context.add_groups(&params.groups);
        context.add_limit(params.limit);
        context.add_offset(params.offset);

        let pool = context.require_connection()?;
        let builder = context.take_builder()?;
        let builder = self.join_tables(builder);
        let builder = self.apply_special_parameters(builder, &params.special);

        Ok((pool, builder))
    }

    /// Run a find and return the matching rows.
    ///
    /// Limit and offset fall back to the configured defaults when absent;
    /// reads are never unbounded unless the caller asks for a larger limit.
    async fn find(&mut self, params: FindParams) -> Result<Vec<Value>, RepoError> {
        let distinct = params.distinct;
        let (pool, builder) = self.prepare_find(&params)?;
        fetch_rows(&pool, &builder.distinct(distinct)).await
    }

    /// Fetch the first matching row; failing with `QueryNotFound` when
    /// nothing matches unless `allow_null_result` is set.
    async fn first(
        &mut self,
        params: FindParams,
        allow_null_result: bool,
    ) -> Result<Option<Value>, RepoError> {
        let (pool, builder) = self.prepare_find(&params)?;
        fetch_first(&pool, builder.limit(1), allow_null_result).await
    }

    /// `first` with an implicit `id = <value>` equality filter
    async fn find_by_id(
        &mut self,
        id: Value,
        selects: Vec<SelectExpr>,
        allow_null_result: bool,
    ) -> Result<Option<Value>, RepoError> {
        let mut params = FindParams::new();
        params.selects = selects;

        let (pool, builder) = self.prepare_find(&params)?;
        let column = format!("{}.id", builder.table());
        let builder = builder.filter(QueryFilter::eq(&column, id)).limit(1);

        fetch_first(&pool, builder, allow_null_result).await
    }

    /// Insert `data` inside a transaction.
    ///
    /// With `return_data`, the row is re-fetched after the commit by value
    /// equality on every provided field. The re-fetch is a best-effort
    /// match, not a row-identity guarantee: when `data` underspecifies a
    /// unique key, the returned row may be a different record holding
    /// identical values.
    async fn create(
        &mut self,
        data: FieldValues,
        return_data: bool,
    ) -> Result<Option<Value>, RepoError> {
        let context = self.context_mut();
        context.ensure_builder()?;
        let pool = context.require_connection()?;
        let builder = context.take_builder()?;
        let table = builder.table().to_string();

        let mut tx = pool
            .begin()
            .await
            .map_err(|e| RepoError::database(&table, e))?;

        let (sql, binds) = builder.build_insert(&data);
        tracing::debug!(table = %table, sql = %sql, params = binds.len(), "executing create");
        let mut query = sqlx::query(&sql);
        for value in binds {
            query = bind_value(query, value);
        }
        query
            .execute(tx.as_mut())
            .await
            .map_err(|e| RepoError::database(&table, e))?;

        tx.commit()
            .await
            .map_err(|e| RepoError::database(&table, e))?;

        if !return_data {
            return Ok(None);
        }

        let context = self.context_mut();
        context.create_builder(None, None)?;
        context.replace_where_clause(&data);
        let builder = context.take_builder()?;

        fetch_first(&pool, builder.limit(1), true).await
    }

    /// Update rows matching the predicate set.
    ///
    /// A non-empty `wheres` replaces the builder's current predicates with
    /// those equality predicates. Zero predicates without
    /// `force_empty_where` abort the transaction with `EmptyWhereClause`
    /// before any row changes. With `return_data`, rows matching the
    /// updated values are fetched after the commit (same value-equality
    /// caveat as `create`).
    async fn update(
        &mut self,
        updated_data: FieldValues,
        wheres: FieldValues,
        return_data: bool,
        force_empty_where: bool,
    ) -> Result<Option<Vec<Value>>, RepoError> {
        let context = self.context_mut();
        context.ensure_builder()?;
        if !wheres.is_empty() {
            context.replace_where_clause(&wheres);
        }
        let pool = context.require_connection()?;
        let builder = context.take_builder()?;
        let table = builder.table().to_string();

        let mut tx = pool
            .begin()
            .await
            .map_err(|e| RepoError::database(&table, e))?;

        if !builder.has_conditions() && !force_empty_where {
            // dropping the open transaction rolls it back
            return Err(RepoError::empty_where_clause());
        }

        let (sql, binds) = builder.build_update(&updated_data);
        tracing::debug!(table = %table, sql = %sql, params = binds.len(), "executing update");
        let mut query = sqlx::query(&sql);
        for value in binds {
            query = bind_value(query, value);
        }
        query
            .execute(tx.as_mut())
            .await
            .map_err(|e| RepoError::database(&table, e))?;

        tx.commit()
            .await
            .map_err(|e| RepoError::database(&table, e))?;

        if !return_data {
            return Ok(None);
        }

        let context = self.context_mut();
        context.create_builder(None, None)?;
        context.replace_where_clause(&updated_data);
        let builder = context.take_builder()?;

        let rows = fetch_rows(&pool, &builder).await?;
        Ok(Some(rows))
    }

    /// Delete rows matching the predicate set.
    ///
    /// Same predicate replacement and empty-where guard as `update`. With
    /// `return_data`, the matching rows are read inside the transaction
    /// before the delete executes, so the caller receives exactly what was
    /// removed.
    async fn delete(
        &mut self,
        parameters: FieldValues,
        return_data: bool,
        force_empty_where: bool,
    ) -> Result<Option<Vec<Value>>, RepoError> {
        let context = self.context_mut();
        context.ensure_builder()?;
        if !parameters.is_empty() {
            context.replace_where_clause(&parameters);
        }
        let pool = context.require_connection()?;
        let builder = context.take_builder()?;
        let table = builder.table().to_string();

        let mut tx = pool
            .begin()
            .await
            .map_err(|e| RepoError::database(&table, e))?;

        if !builder.has_conditions() && !force_empty_where {
            return Err(RepoError::empty_where_clause());
        }

        let removed = if return_data {
            let (sql, binds) = builder.build_select();
            let mut query = sqlx::query(&sql);
            for value in binds {
                query = bind_value(query, value);
            }
            let rows = query
                .fetch_all(tx.as_mut())
                .await
                .map_err(|e| RepoError::database(&table, e))?;
            Some(row::rows_to_values(&rows)?)
        } else {
            None
        };

        let (sql, binds) = builder.build_delete();
        tracing::debug!(table = %table, sql = %sql, params = binds.len(), "executing delete");
        let mut query = sqlx::query(&sql);
        for value in binds {
            query = bind_value(query, value);
        }
        query
            .execute(tx.as_mut())
            .await
            .map_err(|e| RepoError::database(&table, e))?;

        tx.commit()
            .await
            .map_err(|e| RepoError::database(&table, e))?;

        Ok(removed)
    }

    /// Remove every row of the table. Truncation is whole-table by
    /// definition, so the empty-where guard does not apply.
    async fn truncate(&mut self) -> Result<(), RepoError> {
        let context = self.context_mut();
        context.ensure_builder()?;
        let pool = context.require_connection()?;
        let builder = context.take_builder()?;
        let table = builder.table().to_string();

        let mut tx = pool
            .begin()
            .await
            .map_err(|e| RepoError::database(&table, e))?;

        let sql = builder.build_truncate();
        tracing::debug!(table = %table, sql = %sql, "executing truncate");
        sqlx::query(&sql)
            .execute(tx.as_mut())
            .await
            .map_err(|e| RepoError::database(&table, e))?;

        tx.commit()
            .await
            .map_err(|e| RepoError::database(&table, e))?;

        Ok(())
    }
}

/// Plain repository over one flat table, with no custom hooks
pub struct TableRepository {
    context: RepositoryContext,
}

impl TableRepository {
    pub fn new(context: RepositoryContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl Repository for TableRepository {
    fn context(&self) -> &RepositoryContext {
        &self.context
    }

    fn context_mut(&mut self) -> &mut RepositoryContext {
        &mut self.context
    }
}

async fn fetch_rows(pool: &PgPool, builder: &QueryBuilder) -> Result<Vec<Value>, RepoError> {
    let (sql, binds) = builder.build_select();
    tracing::debug!(table = builder.table(), sql = %sql, params = binds.len(), "executing select");

    let mut query = sqlx::query(&sql);
    for value in binds {
        query = bind_value(query, value);
    }

    let rows = query
        .fetch_all(pool)
        .await
        .map_err(|e| RepoError::database(builder.table(), e))?;

    row::rows_to_values(&rows)
}

async fn fetch_first(
    pool: &PgPool,
    builder: QueryBuilder,
    allow_null_result: bool,
) -> Result<Option<Value>, RepoError> {
    let (sql, binds) = builder.build_select();
    tracing::debug!(table = builder.table(), sql = %sql, params = binds.len(), "executing select");

    let mut query = sqlx::query(&sql);
    for value in binds {
        query = bind_value(query, value);
    }

    let row = query
        .fetch_optional(pool)
        .await
        .map_err(|e| RepoError::database(builder.table(), e))?;

    match row {
        Some(row) => Ok(Some(row::row_to_value(&row)?)),
        None if allow_null_result => Ok(None),
        None => Err(RepoError::query_not_found(builder.table())),
    }
}
