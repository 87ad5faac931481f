use crate::errors::RepoError;
use crate::params::{FilterValue, OrderParam, Separators};
use crate::query_builder::SelectExpr;
use crate::registry::ConnectionRegistry;
use crate::repository::{
    FindParams, Repository, RepositoryContext, RepositoryDefaults, RepositorySettings,
    TableRepository,
};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

mod billing {
    pub struct UserProfile;
}

// Lazy pools never dial out, so lifecycle and assembly are testable without
// a running server.
fn lazy_pool() -> PgPool {
    PgPool::connect_lazy("postgres://postgres@localhost/tabula_test").expect("lazy pool")
}

fn registry() -> Arc<ConnectionRegistry> {
    let mut registry = ConnectionRegistry::new();
    registry.register("billing", lazy_pool()).expect("register billing");
    registry.register("default", lazy_pool()).expect("register default");
    Arc::new(registry)
}

fn users_context() -> RepositoryContext {
    RepositoryContext::new(registry(), RepositoryDefaults::new("users", "default"))
}

fn users_repository() -> TableRepository {
    TableRepository::new(users_context())
}

#[test]
fn defaults_derive_from_type_path() {
    let defaults = RepositoryDefaults::for_type::<billing::UserProfile>();

    assert_eq!(defaults.table_name, "user_profile");
    assert_eq!(defaults.connection_name, "billing");
}

#[tokio::test]
async fn builder_is_created_lazily_from_defaults() {
    let mut context = RepositoryContext::new(
        registry(),
        RepositoryDefaults::for_type::<billing::UserProfile>(),
    );
    assert!(context.builder().is_none());
    assert!(context.table_name().is_none());
    assert!(context.connection().is_none());

    context.ensure_builder().expect("ensure builder");

    assert_eq!(context.table_name(), Some("user_profile"));
    assert_eq!(context.connection_name(), Some("billing"));
    assert!(context.connection().is_some());
    let builder = context.builder().expect("builder created");
    assert_eq!(builder.table(), "user_profile");
}

#[tokio::test]
async fn explicit_overrides_win_over_defaults() {
    let mut context = users_context();
    context
        .create_builder(Some("accounts"), Some("billing"))
        .expect("create builder");

    assert_eq!(context.table_name(), Some("accounts"));
    assert_eq!(context.connection_name(), Some("billing"));
    assert_eq!(context.builder().map(|b| b.table()), Some("accounts"));
}

#[tokio::test]
async fn unknown_connection_is_an_error() {
    let mut context = users_context();
    let err = context.set_connection_name("reporting").unwrap_err();

    assert!(matches!(err, RepoError::UnknownConnection(name) if name == "reporting"));
}

#[tokio::test]
async fn qualifies_bare_columns_only() {
    let mut context = users_context();
    context.ensure_builder().expect("ensure builder");

    assert_eq!(context.qualify_column("age"), "users.age");
    assert_eq!(context.qualify_column("u.age"), "u.age");
}

#[tokio::test]
async fn wheres_decode_into_predicates() {
    let mut context = users_context();
    context.ensure_builder().expect("ensure builder");

    context.add_wheres(&[
        ("age".to_string(), FilterValue::from("gte|18")),
        ("name".to_string(), FilterValue::from("like|%ann%")),
        ("plain".to_string(), FilterValue::from("direct")),
    ]);

    let (sql, values) = context.builder().expect("builder").build_select();
    assert!(sql.contains("users.age >= $1"));
    assert!(sql.contains("users.name LIKE $2"));
    assert!(sql.contains("users.plain = $3"));
    assert_eq!(values, vec![json!(18), json!("%ann%"), json!("direct")]);
}

#[tokio::test]
async fn many_filters_on_one_column_are_conjunctions() {
    let mut context = users_context();
    context.ensure_builder().expect("ensure builder");

    context.add_wheres(&[(
        "age".to_string(),
        FilterValue::from(vec!["gte|18", "lt|65"]),
    )]);

    let (sql, values) = context.builder().expect("builder").build_select();
    assert!(sql.contains("users.age >= $1 AND users.age < $2"));
    assert_eq!(values, vec![json!(18), json!(65)]);
}

#[tokio::test]
async fn in_filter_with_null_widens_to_null_rows() {
    let mut context = users_context();
    context.ensure_builder().expect("ensure builder");

    context.add_wheres(&[("x".to_string(), FilterValue::from("in|1;2;null"))]);

    let (sql, values) = context.builder().expect("builder").build_select();
    assert!(sql.contains("(users.x IS NULL OR users.x IN ($1, $2))"));
    assert_eq!(values, vec![json!(1), json!(2)]);
}

#[tokio::test]
async fn null_token_builds_null_checks() {
    let mut context = users_context();
    context.ensure_builder().expect("ensure builder");

    context.add_wheres(&[
        ("a".to_string(), FilterValue::from("null|true")),
        ("b".to_string(), FilterValue::from("null|false")),
    ]);

    let (sql, values) = context.builder().expect("builder").build_select();
    assert!(sql.contains("users.a IS NULL"));
    assert!(sql.contains("users.b IS NOT NULL"));
    assert!(values.is_empty());
}

#[tokio::test]
async fn mixed_orders_keep_insertion_order() {
    let mut context = users_context();
    context.ensure_builder().expect("ensure builder");

    context.add_orders(&[
        OrderParam::positional("name"),
        OrderParam::keyed("age", "desc"),
    ]);

    let (sql, _) = context.builder().expect("builder").build_select();
    assert!(sql.contains("ORDER BY users.name ASC, users.age DESC"));
}

#[tokio::test]
async fn groups_are_qualified_in_order() {
    let mut context = users_context();
    context.ensure_builder().expect("ensure builder");

    context.add_groups(&["role".to_string(), "t.region".to_string()]);

    let (sql, _) = context.builder().expect("builder").build_select();
    assert!(sql.contains("GROUP BY users.role, t.region"));
}

#[tokio::test]
async fn replace_where_clause_installs_fresh_equalities() {
    let mut context = users_context();
    context.ensure_builder().expect("ensure builder");

    context.add_wheres(&[("age".to_string(), FilterValue::from("gte|18"))]);
    context.replace_where_clause(&[("status".to_string(), json!("archived"))]);

    let (sql, values) = context.builder().expect("builder").build_select();
    assert!(sql.contains("WHERE users.status = $1"));
    assert!(!sql.contains("users.age"));
    assert_eq!(values, vec![json!("archived")]);
}

#[tokio::test]
async fn custom_separators_apply() {
    let settings = RepositorySettings {
        separators: Separators {
            parameter: ':',
            list: ',',
        },
        ..RepositorySettings::default()
    };
    let mut context = RepositoryContext::with_settings(
        registry(),
        RepositoryDefaults::new("users", "default"),
        settings,
    );
    context.ensure_builder().expect("ensure builder");

    context.add_wheres(&[("id".to_string(), FilterValue::from("in:1,2"))]);

    let (sql, values) = context.builder().expect("builder").build_select();
    assert!(sql.contains("users.id IN ($1, $2)"));
    assert_eq!(values, vec![json!(1), json!(2)]);
}

#[tokio::test]
async fn prepare_find_applies_defaults_and_bounds() {
    let mut repo = users_repository();

    let (_, builder) = repo.prepare_find(&FindParams::new()).expect("prepare find");

    let (sql, values) = builder.build_select();
    assert_eq!(sql, "SELECT users.* FROM users LIMIT 10 OFFSET 0");
    assert!(values.is_empty());
}

#[tokio::test]
async fn prepare_find_honors_explicit_parameters() {
    let mut repo = users_repository();
    let params = FindParams::new()
        .select(SelectExpr::column("name"))
        .filter("age", "gte|18")
        .order(OrderParam::keyed("age", "desc"))
        .limit(50)
        .offset(5);

    let (_, builder) = repo.prepare_find(&params).expect("prepare find");

    let (sql, values) = builder.build_select();
    assert_eq!(
        sql,
        "SELECT users.name FROM users WHERE users.age >= $1 \
         ORDER BY users.age DESC LIMIT 50 OFFSET 5"
    );
    assert_eq!(values, vec![json!(18)]);

    let (sql, _) = builder.distinct(true).build_select();
    assert!(sql.starts_with("SELECT DISTINCT"));
}

#[tokio::test]
async fn builder_lives_for_one_statement() {
    let mut repo = users_repository();

    repo.prepare_find(&FindParams::new()).expect("prepare find");

    // the executed builder is gone; the next operation starts fresh
    assert!(repo.context().builder().is_none());
    repo.context_mut().ensure_builder().expect("ensure builder");
    let (sql, _) = repo.context().builder().expect("builder").build_select();
    assert_eq!(sql, "SELECT * FROM users");
}

#[test]
fn error_messages_are_overridable() {
    let default_err = RepoError::empty_where_clause();
    assert_eq!(
        default_err.to_string(),
        crate::errors::EMPTY_WHERE_CLAUSE_MESSAGE
    );

    let custom = RepoError::empty_where_clause_message("refusing to touch every row");
    assert_eq!(custom.to_string(), "refusing to touch every row");

    let not_found = RepoError::query_not_found("users");
    assert!(not_found.to_string().contains("users"));
}
