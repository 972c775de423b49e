//! Trait definitions
//!
//! This module defines the CRUD surface shared by typed stores.

use async_trait::async_trait;
use type_mapping::Value;

use crate::errors::OrmError;
use crate::generic_store::WriteOutcome;
use crate::query_builder::FindOptions;
use crate::traits::model::Model;

/// Database operations over one mapped type
#[async_trait]
pub trait StoreObject: Send + Sync {
    /// The model type that this store reads and writes
    type Model: Model;

    /// Get a value by its primary key
    async fn find(&self, key: Value) -> Result<Option<Self::Model>, OrmError>;

    /// Values matching an optional filter, ordered and limited as requested
    async fn find_all(&self, options: FindOptions) -> Result<Vec<Self::Model>, OrmError>;

    /// Evaluate an aggregate expression over the table
    async fn count_where(
        &self,
        select_field: &str,
        filter: Option<&str>,
        args: Vec<Value>,
    ) -> Result<Option<Value>, OrmError>;

    /// Insert a value; defaults resolved for missing fields are written back into it
    async fn save(&self, data: &mut Self::Model) -> Result<WriteOutcome, OrmError>;

    /// Update a value by its primary key
    async fn update(&self, data: &Self::Model) -> Result<WriteOutcome, OrmError>;

    /// Delete a value by its primary key
    async fn remove(&self, data: &Self::Model) -> Result<WriteOutcome, OrmError>;
}
