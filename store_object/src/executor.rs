//! Query executor
//!
//! Runs templated statements with positional arguments on a pooled connection.
//! Every call is one scoped acquire, execute, release cycle: the connection goes back
//! to the pool on every exit path, including cancellation of the calling task.

use std::collections::BTreeMap;

use futures::{StreamExt, TryStreamExt};
use sqlx::any::{AnyArguments, AnyRow};
use sqlx::query::Query;
use sqlx::{Any, AnyConnection, Column, Row};
use type_mapping::{StoredType, Value};

use crate::errors::OrmError;
use crate::pool::Pool;
use crate::transaction::Transaction;

/// One result row, keyed by column name
pub type RowMap = BTreeMap<String, Value>;

/// A statement argument with the storage type of the column it binds to, when known.
///
/// The type only decides how `Null` is bound: drivers with strictly typed parameters
/// (Postgres) reject a text null assigned to a numeric or boolean column.
#[derive(Debug, Clone, PartialEq)]
pub struct Arg {
    pub value: Value,
    pub stored_type: Option<StoredType>,
}

impl Arg {
    pub fn typed(value: impl Into<Value>, stored_type: StoredType) -> Self {
        Self {
            value: value.into(),
            stored_type: Some(stored_type),
        }
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Self {
            value,
            stored_type: None,
        }
    }
}

pub(crate) fn untyped(args: &[Value]) -> Vec<Arg> {
    args.iter().cloned().map(Arg::from).collect()
}

#[derive(Debug, Clone)]
pub struct Executor {
    pool: Pool,
}

impl Executor {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Run a row-returning statement, fetching every row or at most `limit` rows.
    ///
    /// Never opens a transaction.
    pub async fn query(
        &self,
        sql: &str,
        args: &[Value],
        limit: Option<usize>,
    ) -> Result<Vec<RowMap>, OrmError> {
        let native = self.pool.dialect().translate(sql);
        crate::debug_log!("SQL: {} (args: {})", sql, args.len());
        crate::trace_log!("bound args: {:?}", args);

        let mut conn = self.pool.acquire().await?;
        let rows = fetch_rows(&mut conn, &native, &untyped(args), limit)
            .await
            .map_err(|e| OrmError::query(sql, e))?;

        crate::debug_log!("rows returned: {}", rows.len());
        Ok(rows)
    }

    /// Run a write statement and return the affected-row count.
    ///
    /// With `explicit_transaction` the statement runs between begin and commit and
    /// any failure rolls back before the original error is returned; a failed
    /// rollback is logged only. Without it the connection's autocommit mode applies.
    pub async fn execute(
        &self,
        sql: &str,
        args: &[Value],
        explicit_transaction: bool,
    ) -> Result<u64, OrmError> {
        self.execute_args(sql, &untyped(args), explicit_transaction).await
    }

    /// [`Executor::execute`] with column-typed arguments
    pub async fn execute_args(
        &self,
        sql: &str,
        args: &[Arg],
        explicit_transaction: bool,
    ) -> Result<u64, OrmError> {
        let native = self.pool.dialect().translate(sql);
        crate::debug_log!("SQL: {} (args: {})", sql, args.len());
        crate::trace_log!("bound args: {:?}", args);

        if !explicit_transaction {
            let mut conn = self.pool.acquire().await?;
            return run_statement(&mut conn, &native, args)
                .await
                .map_err(|e| OrmError::query(sql, e));
        }

        // Dropping `tx` on cancellation rolls it back
        let mut tx = self.pool.begin().await?;
        match run_statement(&mut tx, &native, args).await {
            Ok(affected) => {
                tx.commit().await.map_err(|e| OrmError::query(sql, e))?;
                Ok(affected)
            }
            Err(e) => {
                if let Err(rollback_error) = tx.rollback().await {
                    tracing::warn!("rollback failed after error in `{}`: {}", sql, rollback_error);
                }
                Err(OrmError::query(sql, e))
            }
        }
    }

    /// Open an explicit transaction spanning several statements
    pub async fn begin(&self) -> Result<Transaction, OrmError> {
        let tx = self.pool.begin().await?;
        Ok(Transaction::new(tx, self.pool.dialect()))
    }
}

fn bind_values<'q>(
    mut query: Query<'q, Any, AnyArguments<'q>>,
    args: &[Arg],
) -> Query<'q, Any, AnyArguments<'q>> {
    for arg in args {
        query = match &arg.value {
            Value::Null => match arg.stored_type {
                Some(StoredType::Boolean) => query.bind(None::<bool>),
                Some(StoredType::Integer) => query.bind(None::<i64>),
                Some(StoredType::Float) => query.bind(None::<f64>),
                Some(StoredType::String | StoredType::Text) | None => query.bind(None::<String>),
            },
            Value::Boolean(b) => query.bind(*b),
            Value::Integer(i) => query.bind(*i),
            Value::Float(f) => query.bind(*f),
            Value::Text(s) => query.bind(s.clone()),
        };
    }
    query
}

pub(crate) async fn fetch_rows(
    conn: &mut AnyConnection,
    sql: &str,
    args: &[Arg],
    limit: Option<usize>,
) -> Result<Vec<RowMap>, sqlx::Error> {
    let query = bind_values(sqlx::query::<Any>(sql), args);
    let rows: Vec<AnyRow> = match limit {
        Some(limit) => query.fetch(&mut *conn).take(limit).try_collect().await?,
        None => query.fetch_all(&mut *conn).await?,
    };
    rows.iter().map(decode_row).collect()
}

pub(crate) async fn run_statement(
    conn: &mut AnyConnection,
    sql: &str,
    args: &[Arg],
) -> Result<u64, sqlx::Error> {
    let result = bind_values(sqlx::query::<Any>(sql), args)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

fn decode_row(row: &AnyRow) -> Result<RowMap, sqlx::Error> {
    let mut map = RowMap::new();
    for (index, column) in row.columns().iter().enumerate() {
        map.insert(column.name().to_string(), decode_column(row, index)?);
    }
    Ok(map)
}

/// Decode a column whose type is only known at runtime; the first compatible
/// representation wins and schema-aware coercion happens later
fn decode_column(row: &AnyRow, index: usize) -> Result<Value, sqlx::Error> {
    if let Ok(value) = row.try_get::<Option<i64>, _>(index) {
        return Ok(Value::from(value));
    }
    if let Ok(value) = row.try_get::<Option<f64>, _>(index) {
        return Ok(Value::from(value));
    }
    if let Ok(value) = row.try_get::<Option<f32>, _>(index) {
        return Ok(Value::from(value));
    }
    if let Ok(value) = row.try_get::<Option<bool>, _>(index) {
        return Ok(Value::from(value));
    }
    if let Ok(value) = row.try_get::<Option<String>, _>(index) {
        return Ok(Value::from(value));
    }
    let bytes = row.try_get::<Option<Vec<u8>>, _>(index)?;
    Ok(bytes
        .map(|b| Value::Text(String::from_utf8_lossy(&b).into_owned()))
        .unwrap_or(Value::Null))
}
