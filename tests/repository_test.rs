//! Integration tests for the guarded repository operations.
//!
//! These exercise find/first/create/update/delete/truncate against a live
//! PostgreSQL instance and are skipped unless `DATABASE_URL` is set.

use serde_json::json;
use tabula::prelude::*;

async fn setup(table: &str) -> Option<Tabula> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("skipping integration test: DATABASE_URL is not set");
        return None;
    };

    let pool = PgPool::connect(&database_url).await.expect("connect");
    sqlx::query(&format!(
        "CREATE TABLE IF NOT EXISTS {table} (\
            id BIGSERIAL PRIMARY KEY, \
            name TEXT NOT NULL, \
            age BIGINT, \
            status TEXT\
        )"
    ))
    .execute(&pool)
    .await
    .expect("create table");
    sqlx::query(&format!("TRUNCATE TABLE {table}"))
        .execute(&pool)
        .await
        .expect("reset table");

    let mut registry = ConnectionRegistry::new();
    registry.register("default", pool).expect("register pool");

    Some(Tabula::with_registry(registry, RepositorySettings::default()))
}

fn record(name: &str, age: Option<i64>, status: &str) -> FieldValues {
    let mut fields = vec![("name".to_string(), json!(name))];
    if let Some(age) = age {
        fields.push(("age".to_string(), json!(age)));
    }
    fields.push(("status".to_string(), json!(status)));
    fields
}

fn names(rows: &[Value]) -> Vec<&str> {
    rows.iter()
        .filter_map(|row| row["name"].as_str())
        .collect()
}

#[tokio::test]
async fn guarded_repository_end_to_end() {
    let table = "tabula_guard_test";
    let Some(tabula) = setup(table).await else {
        return;
    };
    let mut repo = tabula.repository(RepositoryDefaults::new(table, "default"));

    // create with return_data re-fetches the inserted row by value equality
    let ann = repo
        .create(record("ann", Some(30), "active"), true)
        .await
        .expect("create ann")
        .expect("ann returned");
    assert_eq!(ann["name"], json!("ann"));
    assert_eq!(ann["age"], json!(30));

    repo.create(record("ben", Some(41), "archived"), false)
        .await
        .expect("create ben");
    repo.create(record("cam", Some(55), "archived"), false)
        .await
        .expect("create cam");
    // no age: the column stays NULL
    repo.create(record("dan", None, "active"), false)
        .await
        .expect("create dan");

    // encoded comparison filter with explicit ordering
    let adults = repo
        .find(
            FindParams::new()
                .filter("age", "gte|40")
                .order(OrderParam::keyed("age", "desc")),
        )
        .await
        .expect("find adults");
    assert_eq!(names(&adults), vec!["cam", "ben"]);

    // an `in` list containing `null` widens the match to NULL rows
    let with_null = repo
        .find(
            FindParams::new()
                .filter("age", "in|30;null")
                .order(OrderParam::positional("name")),
        )
        .await
        .expect("find in-with-null");
    assert_eq!(names(&with_null), vec!["ann", "dan"]);

    let null_aged = repo
        .find(FindParams::new().filter("age", "null|true"))
        .await
        .expect("find null ages");
    assert_eq!(names(&null_aged), vec!["dan"]);

    // find_by_id routes through the implicit id equality filter
    let ann_id = ann["id"].clone();
    let by_id = repo
        .find_by_id(ann_id, vec![], false)
        .await
        .expect("find by id")
        .expect("row present");
    assert_eq!(by_id["name"], json!("ann"));

    // first without a nullable opt-in fails on an empty match
    let err = repo
        .first(FindParams::new().filter("name", "zed"), false)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::QueryNotFound { .. }));

    let missing = repo
        .first(FindParams::new().filter("name", "zed"), true)
        .await
        .expect("first with nullable opt-in");
    assert!(missing.is_none());

    // the empty-where guard aborts before any row changes
    let err = repo
        .update(vec![("status".to_string(), json!("x"))], vec![], false, false)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::EmptyWhereClause { .. }));
    let untouched = repo
        .find(FindParams::new().filter("status", "x"))
        .await
        .expect("find untouched");
    assert!(untouched.is_empty());

    // targeted update returns the rows matching the updated values
    let updated = repo
        .update(
            vec![("age".to_string(), json!(31))],
            vec![("name".to_string(), json!("ann"))],
            true,
            false,
        )
        .await
        .expect("update ann")
        .expect("updated rows returned");
    assert_eq!(names(&updated), vec!["ann"]);
    assert_eq!(updated[0]["age"], json!(31));

    // forcing an empty where updates every row
    repo.update(
        vec![("status".to_string(), json!("seen"))],
        vec![],
        false,
        true,
    )
    .await
    .expect("forced update");
    let seen = repo
        .find(FindParams::new().filter("status", "seen").limit(100))
        .await
        .expect("find seen");
    assert_eq!(seen.len(), 4);

    // delete returns the removed rows as they were before deletion
    repo.update(
        vec![("status".to_string(), json!("archived"))],
        vec![("name".to_string(), json!("ben"))],
        false,
        false,
    )
    .await
    .expect("re-archive ben");
    let removed = repo
        .delete(vec![("status".to_string(), json!("archived"))], true, false)
        .await
        .expect("delete archived")
        .expect("removed rows returned");
    assert_eq!(names(&removed), vec!["ben"]);

    let archived_after = repo
        .find(FindParams::new().filter("status", "archived"))
        .await
        .expect("find archived after delete");
    assert!(archived_after.is_empty());

    // truncate ignores predicates and requires no where-clause justification
    repo.truncate().await.expect("truncate");
    let all = repo
        .find(FindParams::new().limit(100))
        .await
        .expect("find after truncate");
    assert!(all.is_empty());
}

#[tokio::test]
async fn reads_are_bounded_by_default() {
    let table = "tabula_bounds_test";
    let Some(tabula) = setup(table).await else {
        return;
    };
    let mut repo = tabula.repository(RepositoryDefaults::new(table, "default"));

    for index in 0..15 {
        repo.create(record(&format!("user_{index:02}"), Some(index), "active"), false)
            .await
            .expect("seed row");
    }

    // no explicit bounds: the default limit (10) from the default offset (0)
    let bounded = repo
        .find(FindParams::new().order(OrderParam::positional("name")))
        .await
        .expect("bounded find");
    assert_eq!(bounded.len(), 10);
    assert_eq!(bounded[0]["name"], json!("user_00"));

    let offset_page = repo
        .find(
            FindParams::new()
                .order(OrderParam::positional("name"))
                .offset(10),
        )
        .await
        .expect("offset page");
    assert_eq!(offset_page.len(), 5);
    assert_eq!(offset_page[0]["name"], json!("user_10"));

    let everything = repo
        .find(
            FindParams::new()
                .order(OrderParam::positional("name"))
                .limit(100),
        )
        .await
        .expect("explicit large limit");
    assert_eq!(everything.len(), 15);
}
