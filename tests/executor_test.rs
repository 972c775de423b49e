//! Integration tests for the pool and query executor
//!
//! Covers explicit transactions, cancellation, pool bounds and lifecycle, and health checks.

mod common;

use std::time::Duration;

use common::{setup, sqlite_config, ACCOUNTS_DDL};
use minorm::prelude::*;
use tempfile::TempDir;

async fn balance_of(executor: &Executor, id: i64) -> Option<Value> {
    let rows = executor
        .query(
            "select `balance` from `accounts` where `id`=?",
            &[id.into()],
            Some(1),
        )
        .await
        .expect("query");
    rows.into_iter().next().and_then(|mut row| row.remove("balance"))
}

async fn account_count(executor: &Executor) -> i64 {
    let rows = executor
        .query("select count(*) as n from `accounts`", &[], None)
        .await
        .expect("count");
    rows.first()
        .and_then(|row| row.get("n"))
        .and_then(Value::as_i64)
        .expect("count value")
}

#[tokio::test]
async fn test_query_returns_column_named_rows() {
    let db = setup(&[ACCOUNTS_DDL]).await;
    let executor = db.orm.executor();
    executor
        .execute(
            "insert into `accounts` (`owner`, `balance`, `id`) values (?, ?, ?), (?, ?, ?)",
            &["ann".into(), 1.5.into(), 1.into(), Value::Null, 2.5.into(), 2.into()],
            false,
        )
        .await
        .expect("insert");

    let rows = executor
        .query("select `id`, `owner` from `accounts` order by `id`", &[], None)
        .await
        .expect("query");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("owner"), Some(&Value::from("ann")));
    assert_eq!(rows[1].get("owner"), Some(&Value::Null));

    let bounded = executor
        .query("select `id` from `accounts` order by `id`", &[], Some(1))
        .await
        .expect("query");
    assert_eq!(bounded.len(), 1);
    assert_eq!(bounded[0].get("id"), Some(&Value::Integer(1)));
}

#[tokio::test]
async fn test_failed_explicit_transaction_leaves_state_unchanged() {
    let db = setup(&[ACCOUNTS_DDL]).await;
    let executor = db.orm.executor();
    executor
        .execute(
            "insert into `accounts` (`owner`, `balance`, `id`) values (?, ?, ?)",
            &["ann".into(), 10.0.into(), 1.into()],
            true,
        )
        .await
        .expect("insert");

    // Second row collides with the first, so the whole statement must be undone
    let result = executor
        .execute(
            "insert into `accounts` (`owner`, `balance`, `id`) values (?, ?, ?), (?, ?, ?)",
            &["bob".into(), 20.0.into(), 2.into(), "eve".into(), 30.0.into(), 1.into()],
            true,
        )
        .await;
    assert!(matches!(result, Err(OrmError::Query { .. })));

    assert_eq!(account_count(executor).await, 1);
    assert_eq!(balance_of(executor, 1).await, Some(Value::Float(10.0)));
    assert_eq!(balance_of(executor, 2).await, None);
}

#[tokio::test]
async fn test_transaction_commit_and_rollback() {
    let db = setup(&[ACCOUNTS_DDL]).await;
    let executor = db.orm.executor();
    executor
        .execute(
            "insert into `accounts` (`owner`, `balance`, `id`) values (?, ?, ?), (?, ?, ?)",
            &["ann".into(), 100.0.into(), 1.into(), "bob".into(), 0.0.into(), 2.into()],
            false,
        )
        .await
        .expect("insert");

    let transfer = "update `accounts` set `balance`=`balance`+? where `id`=?";

    let mut tx = db.orm.begin().await.expect("begin");
    tx.execute(transfer, &[(-40.0).into(), 1.into()]).await.expect("debit");
    tx.execute(transfer, &[40.0.into(), 2.into()]).await.expect("credit");
    let inside = tx
        .query("select `balance` from `accounts` where `id`=?", &[2.into()], None)
        .await
        .expect("read inside");
    assert_eq!(inside[0].get("balance"), Some(&Value::Float(40.0)));
    tx.rollback().await.expect("rollback");

    assert_eq!(balance_of(executor, 1).await, Some(Value::Float(100.0)));
    assert_eq!(balance_of(executor, 2).await, Some(Value::Float(0.0)));

    let mut tx = executor.begin().await.expect("begin");
    tx.execute(transfer, &[(-40.0).into(), 1.into()]).await.expect("debit");
    tx.execute(transfer, &[40.0.into(), 2.into()]).await.expect("credit");
    tx.commit().await.expect("commit");

    assert_eq!(balance_of(executor, 1).await, Some(Value::Float(60.0)));
    assert_eq!(balance_of(executor, 2).await, Some(Value::Float(40.0)));
}

#[tokio::test]
async fn test_dropped_transaction_is_rolled_back() {
    let db = setup(&[ACCOUNTS_DDL]).await;
    let executor = db.orm.executor();

    {
        let mut tx = executor.begin().await.expect("begin");
        tx.execute(
            "insert into `accounts` (`owner`, `balance`, `id`) values (?, ?, ?)",
            &["ann".into(), 1.0.into(), 1.into()],
        )
        .await
        .expect("insert");
    }

    assert_eq!(account_count(executor).await, 0);
}

#[tokio::test]
async fn test_pool_never_exceeds_max_size() {
    common::init_tracing();
    let dir = TempDir::new().expect("temp dir");
    let pool = Pool::open(&sqlite_config(&dir, 1, 2).with_connection_timeout(5))
        .await
        .expect("open");
    assert_eq!(pool.max_size(), 2);

    let first = pool.acquire().await.expect("first");
    let second = pool.acquire().await.expect("second");
    assert!(pool.size() <= 2);

    let third = tokio::time::timeout(Duration::from_millis(200), pool.acquire()).await;
    assert!(third.is_err(), "third acquire must wait while two are checked out");

    let waiter = {
        let pool = pool.clone();
        tokio::spawn(async move { pool.acquire().await.map(|_| ()) })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    drop(first);

    tokio::time::timeout(Duration::from_secs(5), waiter)
        .await
        .expect("waiter granted after release")
        .expect("task")
        .expect("acquire");

    drop(second);
    pool.close().await;
}

#[tokio::test]
async fn test_min_connections_are_opened_eagerly() {
    common::init_tracing();
    let dir = TempDir::new().expect("temp dir");
    let pool = Pool::open(&sqlite_config(&dir, 3, 5)).await.expect("open");

    assert_eq!(pool.min_size(), 3);
    assert!(pool.size() >= 3);
    pool.close().await;
}

#[tokio::test]
async fn test_closed_pool_refuses_work() {
    let db = setup(&[ACCOUNTS_DDL]).await;
    db.orm.health_check().await.expect("healthy");

    db.orm.close().await;
    assert!(db.orm.pool().is_closed());
    assert!(matches!(db.orm.pool().acquire().await, Err(OrmError::PoolClosed)));

    let result = db.orm.executor().query("select 1", &[], None).await;
    assert!(matches!(result, Err(OrmError::PoolClosed)));
    assert!(matches!(
        db.orm.health_check().await,
        Err(MinormError::Orm(OrmError::PoolClosed))
    ));
}

#[tokio::test]
async fn test_invalid_config_is_a_connection_error() {
    let config = DatabaseConfig::sqlite("", 1, 2);
    let result = Pool::open(&config).await;
    assert!(matches!(result, Err(OrmError::Connection(_))));
}

const BULK_INSERT: &str = "with recursive seq(n) as (
    select 1 union all select n + 1 from seq where n < 2000000
) insert into `accounts` (`id`, `owner`, `balance`) select n, 'bulk', 0.0 from seq";

const SLOW_COUNT: &str = "with recursive seq(n) as (
    select 1 union all select n + 1 from seq where n < 5000000
) select count(*) as n from seq";

async fn single_connection_executor(dir: &TempDir) -> Executor {
    common::init_tracing();
    let pool = Pool::open(&sqlite_config(dir, 1, 1).with_connection_timeout(60))
        .await
        .expect("open");
    let executor = Executor::new(pool);
    executor
        .execute(ACCOUNTS_DDL, &[], false)
        .await
        .expect("create table");
    executor
}

#[tokio::test]
async fn test_cancelled_query_releases_its_connection() {
    let dir = TempDir::new().expect("temp dir");
    let executor = single_connection_executor(&dir).await;

    let cancelled =
        tokio::time::timeout(Duration::from_millis(20), executor.query(SLOW_COUNT, &[], None))
            .await;
    assert!(cancelled.is_err(), "slow query must still be running when cancelled");

    let rows = tokio::time::timeout(
        Duration::from_secs(60),
        executor.query("select 1 as one", &[], None),
    )
    .await
    .expect("connection returned to the pool")
    .expect("query");
    assert_eq!(rows.len(), 1);
    assert_eq!(executor.pool().size(), 1);

    executor.pool().close().await;
}

#[tokio::test]
async fn test_cancelled_explicit_transaction_is_rolled_back() {
    let dir = TempDir::new().expect("temp dir");
    let executor = single_connection_executor(&dir).await;

    let cancelled = tokio::time::timeout(
        Duration::from_millis(20),
        executor.execute(BULK_INSERT, &[], true),
    )
    .await;
    assert!(cancelled.is_err(), "bulk insert must still be running when cancelled");

    let conn = tokio::time::timeout(Duration::from_secs(60), executor.pool().acquire())
        .await
        .expect("connection returned to the pool")
        .expect("acquire");
    assert_eq!(executor.pool().size(), 1);
    drop(conn);

    assert_eq!(account_count(&executor).await, 0);
    executor.pool().close().await;
}
