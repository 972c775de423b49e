//! Store Object - core mapping and execution layer for minorm
//!
//! This crate provides field descriptors and the schema registry derived from them,
//! statement templates, the connection pool and query executor, and the record and
//! typed-store CRUD surfaces built on top.

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod defaults;
pub mod dialect;
pub mod errors;
pub mod executor;
pub mod field;
pub mod generic_store;
pub mod pool;
pub mod prelude;
pub mod query_builder;
pub mod record;
pub mod schema;
pub mod sql_generation;
pub mod traits;
pub mod transaction;
pub mod validation;

pub use dialect::Dialect;
pub use errors::{OrmError, WriteKind};
pub use executor::{Arg, Executor, RowMap};
pub use field::{FieldDefault, FieldDescriptor};
pub use generic_store::{GenericStore, RowCountPolicy, Store, WriteOutcome};
pub use pool::{Pool, PooledConnection};
pub use query_builder::{FindOptions, Limit};
pub use record::Record;
pub use schema::{Schema, SchemaBuilder};
pub use sql_generation::SqlTemplates;
pub use traits::{Model, StoreObject};
pub use transaction::Transaction;
pub use validation::ValidationError;

pub use type_mapping::{StoredType, Value};
