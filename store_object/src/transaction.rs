//! Transaction support for the executor
//!
//! This module provides an explicit begin/commit/rollback span over one pooled
//! connection, so several statements can be applied atomically.

use sqlx::Any;
use type_mapping::Value;

use crate::dialect::Dialect;
use crate::errors::OrmError;
use crate::executor::{fetch_rows, run_statement, untyped, RowMap};

/// An open transaction holding one pooled connection
///
/// Statements run in submission order on the held connection. Dropping the value
/// without calling [`Transaction::commit`] (including when the owning task is
/// cancelled) rolls the transaction back and returns the connection to the pool.
///
/// # Example
/// ```ignore
/// let mut tx = executor.begin().await?;
/// tx.execute("update `accounts` set `balance`=`balance`-? where `id`=?", &[100.into(), 1.into()]).await?;
/// tx.execute("update `accounts` set `balance`=`balance`+? where `id`=?", &[100.into(), 2.into()]).await?;
/// tx.commit().await?;
/// ```
pub struct Transaction {
    tx: sqlx::Transaction<'static, Any>,
    dialect: Dialect,
}

impl std::fmt::Debug for Transaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("dialect", &self.dialect)
            .finish_non_exhaustive()
    }
}

impl Transaction {
    pub(crate) fn new(tx: sqlx::Transaction<'static, Any>, dialect: Dialect) -> Self {
        Self { tx, dialect }
    }

    pub async fn query(
        &mut self,
        sql: &str,
        args: &[Value],
        limit: Option<usize>,
    ) -> Result<Vec<RowMap>, OrmError> {
        let native = self.dialect.translate(sql);
        crate::debug_log!("SQL (tx): {} (args: {})", sql, args.len());
        fetch_rows(&mut self.tx, &native, &untyped(args), limit)
            .await
            .map_err(|e| OrmError::query(sql, e))
    }

    pub async fn execute(&mut self, sql: &str, args: &[Value]) -> Result<u64, OrmError> {
        let native = self.dialect.translate(sql);
        crate::debug_log!("SQL (tx): {} (args: {})", sql, args.len());
        run_statement(&mut self.tx, &native, &untyped(args))
            .await
            .map_err(|e| OrmError::query(sql, e))
    }

    /// Commit the transaction
    pub async fn commit(self) -> Result<(), OrmError> {
        self.tx
            .commit()
            .await
            .map_err(|e| OrmError::query("commit", e))
    }

    /// Rollback the transaction
    pub async fn rollback(self) -> Result<(), OrmError> {
        self.tx
            .rollback()
            .await
            .map_err(|e| OrmError::query("rollback", e))
    }
}
