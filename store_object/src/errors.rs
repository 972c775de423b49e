use thiserror::Error;

/// Write operation a row count belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    Insert,
    Update,
    Remove,
}

impl std::fmt::Display for WriteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            WriteKind::Insert => "insert",
            WriteKind::Update => "update",
            WriteKind::Remove => "remove",
        })
    }
}

#[derive(Error, Debug)]
pub enum OrmError {
    #[error("Connection error: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("Connection pool is closed")]
    PoolClosed,

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Value error: {0}")]
    Value(String),

    #[error("Unknown field '{field}' for {type_name}")]
    UnknownField { type_name: String, field: String },

    #[error("Query error in `{sql}`: {source}")]
    Query {
        sql: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Affected row mismatch on {operation}: expected {expected}, got {actual}")]
    AffectedRowMismatch {
        operation: WriteKind,
        expected: u64,
        actual: u64,
    },
}

impl OrmError {
    /// Map a failure to obtain a pooled connection
    pub fn acquire(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::PoolClosed => OrmError::PoolClosed,
            other => OrmError::Connection(other),
        }
    }

    /// Map a failure raised while a statement was running
    pub fn query(sql: &str, error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::PoolClosed => OrmError::PoolClosed,
            source => OrmError::Query {
                sql: sql.to_string(),
                source,
            },
        }
    }

    pub fn schema(message: impl Into<String>) -> Self {
        OrmError::Schema(message.into())
    }

    pub fn value(message: impl Into<String>) -> Self {
        OrmError::Value(message.into())
    }
}
