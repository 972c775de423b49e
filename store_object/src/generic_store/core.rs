use std::sync::Arc;

use type_mapping::Value;

use crate::errors::{OrmError, WriteKind};
use crate::executor::Executor;
use crate::query_builder::{build_count, build_find_all, build_find_by_key, FindOptions, COUNT_ALIAS};
use crate::record::Record;
use crate::schema::Schema;

/// How writes react to an affected-row count other than one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowCountPolicy {
    /// Log a warning and report the count in the returned [`WriteOutcome`]
    #[default]
    Warn,
    /// Fail with [`OrmError::AffectedRowMismatch`]
    Strict,
}

/// Result of a single-row write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOutcome {
    pub operation: WriteKind,
    pub affected: u64,
}

impl WriteOutcome {
    /// Whether exactly one row was written
    pub fn is_exact(&self) -> bool {
        self.affected == 1
    }
}

/// Schema-driven CRUD over records of any registered type
#[derive(Debug, Clone)]
pub struct Store {
    pub(crate) executor: Executor,
    pub(crate) policy: RowCountPolicy,
}

impl Store {
    pub fn new(executor: Executor) -> Self {
        Self {
            executor,
            policy: RowCountPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RowCountPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> RowCountPolicy {
        self.policy
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// Look up one record by primary key; `None` when no row matches
    pub async fn find_by_key(
        &self,
        schema: &Arc<Schema>,
        key: impl Into<Value>,
    ) -> Result<Option<Record>, OrmError> {
        let sql = build_find_by_key(schema);
        let mut rows = self.executor.query(&sql, &[key.into()], Some(1)).await?;
        Ok(rows
            .pop()
            .map(|row| Record::from_row(Arc::clone(schema), row)))
    }

    /// Select records with optional filter, ordering and limit
    pub async fn find_all(
        &self,
        schema: &Arc<Schema>,
        options: &FindOptions,
    ) -> Result<Vec<Record>, OrmError> {
        let (sql, args) = build_find_all(schema, options)?;
        let rows = self.executor.query(&sql, &args, None).await?;
        Ok(rows
            .into_iter()
            .map(|row| Record::from_row(Arc::clone(schema), row))
            .collect())
    }

    /// Evaluate `select_field` (usually an aggregate) over the table, one row
    pub async fn count_where(
        &self,
        schema: &Schema,
        select_field: &str,
        filter: Option<&str>,
        args: &[Value],
    ) -> Result<Option<Value>, OrmError> {
        let sql = build_count(schema, select_field, filter);
        let mut rows = self.executor.query(&sql, args, Some(1)).await?;
        Ok(rows.pop().and_then(|mut row| row.remove(COUNT_ALIAS)))
    }

    /// Insert a record, resolving defaults of missing fields onto it first
    pub async fn save(&self, record: &mut Record) -> Result<WriteOutcome, OrmError> {
        let args = record.insert_args()?;
        let affected = self
            .executor
            .execute_args(record.schema().insert_sql(), &args, false)
            .await?;
        self.check(WriteKind::Insert, affected)
    }

    /// Write the current field values of a record by primary key
    pub async fn update(&self, record: &Record) -> Result<WriteOutcome, OrmError> {
        let args = record.update_args();
        let affected = self
            .executor
            .execute_args(record.schema().update_sql(), &args, false)
            .await?;
        self.check(WriteKind::Update, affected)
    }

    /// Delete a record by primary key
    pub async fn remove(&self, record: &Record) -> Result<WriteOutcome, OrmError> {
        let args = record.key_args();
        let affected = self
            .executor
            .execute_args(record.schema().delete_sql(), &args, false)
            .await?;
        self.check(WriteKind::Remove, affected)
    }

    fn check(&self, operation: WriteKind, affected: u64) -> Result<WriteOutcome, OrmError> {
        let outcome = WriteOutcome { operation, affected };
        if outcome.is_exact() {
            return Ok(outcome);
        }
        match self.policy {
            RowCountPolicy::Warn => {
                tracing::warn!("{}: affected rows: {}", mismatch_message(operation), affected);
                Ok(outcome)
            }
            RowCountPolicy::Strict => Err(OrmError::AffectedRowMismatch {
                operation,
                expected: 1,
                actual: affected,
            }),
        }
    }
}

fn mismatch_message(operation: WriteKind) -> &'static str {
    match operation {
        WriteKind::Insert => "failed to insert record",
        WriteKind::Update => "failed to update by primary key",
        WriteKind::Remove => "failed to remove by primary key",
    }
}
