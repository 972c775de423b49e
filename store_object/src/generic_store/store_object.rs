//! Typed store implementation
//!
//! [`GenericStore`] pairs the schema-driven [`Store`] with one [`Model`] type and
//! converts between the type and its records at the edges.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use type_mapping::Value;

use super::core::{Store, WriteOutcome};
use crate::errors::OrmError;
use crate::query_builder::FindOptions;
use crate::schema::Schema;
use crate::traits::{Model, StoreObject};

pub struct GenericStore<T: Model> {
    store: Store,
    schema: Arc<Schema>,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: Model> Clone for GenericStore<T> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            schema: Arc::clone(&self.schema),
            _phantom: PhantomData,
        }
    }
}

impl<T: Model> std::fmt::Debug for GenericStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenericStore")
            .field("model", &T::TYPE_NAME)
            .field("table", &self.schema.table_name())
            .field("policy", &self.store.policy())
            .finish()
    }
}

impl<T: Model> GenericStore<T> {
    /// Register `T` and bind it to `store`
    pub fn new(store: Store) -> Result<Self, OrmError> {
        let schema = Arc::new(T::schema()?);
        Ok(Self::with_schema(store, schema))
    }

    /// Bind `T` to an already registered schema
    pub fn with_schema(store: Store, schema: Arc<Schema>) -> Self {
        Self {
            store,
            schema,
            _phantom: PhantomData,
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn store(&self) -> &Store {
        &self.store
    }
}

#[async_trait]
impl<T: Model> StoreObject for GenericStore<T> {
    type Model = T;

    async fn find(&self, key: Value) -> Result<Option<T>, OrmError> {
        match self.store.find_by_key(&self.schema, key).await? {
            Some(record) => Ok(Some(T::from_record(&record)?)),
            None => Ok(None),
        }
    }

    async fn find_all(&self, options: FindOptions) -> Result<Vec<T>, OrmError> {
        let records = self.store.find_all(&self.schema, &options).await?;
        records.iter().map(T::from_record).collect()
    }

    async fn count_where(
        &self,
        select_field: &str,
        filter: Option<&str>,
        args: Vec<Value>,
    ) -> Result<Option<Value>, OrmError> {
        self.store
            .count_where(&self.schema, select_field, filter, &args)
            .await
    }

    async fn save(&self, data: &mut T) -> Result<WriteOutcome, OrmError> {
        let mut record = data.to_record(&self.schema)?;
        let outcome = self.store.save(&mut record).await?;
        *data = T::from_record(&record)?;
        Ok(outcome)
    }

    async fn update(&self, data: &T) -> Result<WriteOutcome, OrmError> {
        let record = data.to_record(&self.schema)?;
        self.store.update(&record).await
    }

    async fn remove(&self, data: &T) -> Result<WriteOutcome, OrmError> {
        let record = data.to_record(&self.schema)?;
        self.store.remove(&record).await
    }
}
