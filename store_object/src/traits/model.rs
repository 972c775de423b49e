//! Typed models
//!
//! A [`Model`] is a Rust type whose fields map onto one table. It is usually derived:
//!
//! ```ignore
//! use minorm::prelude::*;
//!
//! #[derive(Debug, Clone, Serialize, Deserialize, Model)]
//! #[table(name = "accounts")]
//! pub struct Account {
//!     #[field(primary_key)]
//!     pub id: i64,
//!     pub owner: Option<String>,
//!     #[field(default = 0.0)]
//!     pub balance: f64,
//! }
//! ```
//!
//! Values travel between the type and its [`Record`] through `serde_json`, so the serde
//! representation of each field must match its declared storage type.

use std::fmt::Debug;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use type_mapping::{json_object_to_values, values_to_json_object};

use crate::errors::OrmError;
use crate::field::FieldDescriptor;
use crate::record::Record;
use crate::schema::Schema;

pub trait Model: Serialize + DeserializeOwned + Send + Sync + Debug {
    /// Name the type is registered under
    const TYPE_NAME: &'static str;

    /// Explicit table name; the type name is used when `None`
    fn table_name() -> Option<&'static str> {
        None
    }

    /// Field declarations in declaration order
    fn fields() -> Vec<(&'static str, FieldDescriptor)>;

    /// Derive the registry entry of this type
    fn schema() -> Result<Schema, OrmError> {
        Schema::register(Self::TYPE_NAME, Self::fields(), Self::table_name())
    }

    /// Copy the mapped fields of this value into a record of `schema`
    fn to_record(&self, schema: &Arc<Schema>) -> Result<Record, OrmError> {
        let json = serde_json::to_value(self)
            .map_err(|e| OrmError::Serialization(format!("{}: {}", Self::TYPE_NAME, e)))?;
        let values = json_object_to_values(&json).ok_or_else(|| {
            OrmError::Serialization(format!("{} does not serialize to an object", Self::TYPE_NAME))
        })?;

        let mut record = Record::new(Arc::clone(schema));
        for (field, value) in values {
            if schema.contains(&field) {
                record.set(&field, value)?;
            }
        }
        Ok(record)
    }

    /// Rebuild a value from a record's fields
    fn from_record(record: &Record) -> Result<Self, OrmError> {
        serde_json::from_value(values_to_json_object(record.values()))
            .map_err(|e| OrmError::Serialization(format!("{}: {}", Self::TYPE_NAME, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use type_mapping::Value;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Account {
        id: i64,
        owner: Option<String>,
        balance: f64,
        active: bool,
    }

    impl Model for Account {
        const TYPE_NAME: &'static str = "Account";

        fn table_name() -> Option<&'static str> {
            Some("accounts")
        }

        fn fields() -> Vec<(&'static str, FieldDescriptor)> {
            vec![
                ("id", FieldDescriptor::integer().primary_key()),
                ("owner", FieldDescriptor::string()),
                ("balance", FieldDescriptor::float()),
                ("active", FieldDescriptor::boolean()),
            ]
        }
    }

    #[test]
    fn test_schema_uses_declared_table() {
        let schema = Account::schema().expect("schema");
        assert_eq!(schema.table_name(), "accounts");
        assert_eq!(schema.primary_key(), "id");
    }

    #[test]
    fn test_record_conversion_keeps_values() {
        let schema = Arc::new(Account::schema().expect("schema"));
        let account = Account {
            id: 4,
            owner: None,
            balance: 2.5,
            active: true,
        };

        let record = account.to_record(&schema).expect("record");
        assert_eq!(record.get("owner"), Some(&Value::Null));
        assert_eq!(record.get("balance"), Some(&Value::Float(2.5)));

        let back = Account::from_record(&record).expect("account");
        assert_eq!(back, account);
    }

    #[test]
    fn test_from_record_reports_missing_required_field() {
        let schema = Arc::new(Account::schema().expect("schema"));
        let record = Record::with_values(schema, [("id", 1)]).expect("record");
        assert!(matches!(
            Account::from_record(&record),
            Err(OrmError::Serialization(_))
        ));
    }
}
