//! Core minorm functionality
//!
//! This module contains the [`Minorm`] coordinator: it owns the connection pool for
//! one database and the registry of mapped types, and hands out stores bound to both.

use std::collections::HashMap;
use std::sync::Arc;

use config::{AppConfig, DatabaseConfig};
use store_object::{
    Executor, GenericStore, Model, Pool, RowCountPolicy, Schema, Store, Transaction,
};

use crate::errors::MinormError;

/// Main coordinator that manages the database connection and registered schemas
#[derive(Debug)]
pub struct Minorm {
    pool: Pool,
    executor: Executor,
    policy: RowCountPolicy,
    schemas: HashMap<String, Arc<Schema>>,
}

impl Minorm {
    /// Open the connection pool described by `config`
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, MinormError> {
        let pool = Pool::open(config).await?;
        Ok(Self {
            executor: Executor::new(pool.clone()),
            pool,
            policy: RowCountPolicy::default(),
            schemas: HashMap::new(),
        })
    }

    /// Connect with the configuration found by [`AppConfig::load`]
    pub async fn from_env() -> Result<Self, MinormError> {
        let config = AppConfig::load()?;
        Self::connect(&config.database).await
    }

    /// Row-count policy used by every store handed out afterwards
    pub fn with_row_count_policy(mut self, policy: RowCountPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Get connection pool reference
    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// Make a registered schema available under its type name
    pub fn register(&mut self, schema: Schema) -> Result<Arc<Schema>, MinormError> {
        let type_name = schema.type_name().to_string();
        if self.schemas.contains_key(&type_name) {
            return Err(MinormError::SchemaAlreadyRegistered(type_name));
        }

        let schema = Arc::new(schema);
        tracing::debug!("registered {} -> {}", type_name, schema.table_name());
        self.schemas.insert(type_name, Arc::clone(&schema));
        Ok(schema)
    }

    /// Derive and register the schema of a model type
    pub fn register_model<T: Model>(&mut self) -> Result<Arc<Schema>, MinormError> {
        self.register(T::schema()?)
    }

    /// Get a registered schema by type name
    pub fn schema(&self, type_name: &str) -> Result<Arc<Schema>, MinormError> {
        self.schemas
            .get(type_name)
            .cloned()
            .ok_or_else(|| MinormError::SchemaNotFound(type_name.to_string()))
    }

    /// List all registered type names
    pub fn list_schemas(&self) -> Vec<&String> {
        self.schemas.keys().collect()
    }

    /// Record-level store for any registered schema
    pub fn store(&self) -> Store {
        Store::new(self.executor.clone()).with_policy(self.policy)
    }

    /// Typed store of a model registered with [`Minorm::register_model`]
    pub fn typed_store<T: Model>(&self) -> Result<GenericStore<T>, MinormError> {
        let schema = self.schema(T::TYPE_NAME)?;
        Ok(GenericStore::with_schema(self.store(), schema))
    }

    /// Start an explicit transaction on one pooled connection
    pub async fn begin(&self) -> Result<Transaction, MinormError> {
        Ok(self.executor.begin().await?)
    }

    /// Check database connection health
    pub async fn health_check(&self) -> Result<(), MinormError> {
        self.executor.query("select 1", &[], Some(1)).await?;
        Ok(())
    }

    /// Refuse new work, let in-flight work finish and close every connection
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
