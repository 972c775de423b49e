//! Convenience re-exports for common store-object usage

// Core traits
pub use crate::traits::{Model, StoreObject};

// Error types
pub use crate::errors::{OrmError, WriteKind};

// Schema declaration
pub use crate::defaults;
pub use crate::field::{FieldDefault, FieldDescriptor};
pub use crate::schema::Schema;

// Execution and CRUD
pub use crate::executor::{Arg, Executor, RowMap};
pub use crate::generic_store::{GenericStore, RowCountPolicy, Store, WriteOutcome};
pub use crate::pool::Pool;
pub use crate::query_builder::{FindOptions, Limit};
pub use crate::record::Record;
pub use crate::transaction::Transaction;

pub use type_mapping::{StoredType, Value};

// Common external dependencies that are frequently used
pub use async_trait::async_trait;
pub use serde::{Deserialize, Serialize};
