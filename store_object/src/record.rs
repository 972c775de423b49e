//! Record instances
//!
//! A [`Record`] is a live value of a mapped type: a key/value container whose keys are
//! restricted to the identifiers its [`Schema`] declares. Records are plain values;
//! two records loaded from the same key are independent copies.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use type_mapping::Value;

use crate::errors::OrmError;
use crate::executor::{Arg, RowMap};
use crate::schema::Schema;

#[derive(Clone)]
pub struct Record {
    schema: Arc<Schema>,
    values: BTreeMap<String, Value>,
}

impl Record {
    /// Empty record of the schema's type
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            values: BTreeMap::new(),
        }
    }

    /// Record holding a partial or full set of field values
    pub fn with_values<I, K, V>(schema: Arc<Schema>, values: I) -> Result<Self, OrmError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut record = Self::new(schema);
        for (field, value) in values {
            record.set(field.as_ref(), value)?;
        }
        Ok(record)
    }

    /// Build a record from one result row keyed by column name.
    ///
    /// Columns the schema does not map are ignored; values are coerced to the
    /// declared storage type of their field.
    pub fn from_row(schema: Arc<Schema>, mut row: RowMap) -> Self {
        let mut values = BTreeMap::new();
        for identifier in schema.identifiers() {
            let (Some(column), Some(descriptor)) =
                (schema.column_name(identifier), schema.field(identifier))
            else {
                continue;
            };
            if let Some(value) = row.remove(column) {
                values.insert(identifier.to_string(), descriptor.stored_type().coerce(value));
            }
        }
        Self { schema, values }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Stored value of a field, if one was set
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Stored value of a field, `Null` when absent
    pub fn value(&self, field: &str) -> Value {
        self.values.get(field).cloned().unwrap_or_default()
    }

    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<(), OrmError> {
        self.check_field(field)?;
        self.values.insert(field.to_string(), value.into());
        Ok(())
    }

    pub fn unset(&mut self, field: &str) -> Option<Value> {
        self.values.remove(field)
    }

    pub fn primary_key_value(&self) -> Value {
        self.value(self.schema.primary_key())
    }

    /// Stored value of a field, or its evaluated default.
    ///
    /// A resolved default is written back onto the record. Without a stored value or a
    /// default the result is `Null` and the record is left unchanged.
    pub fn resolve_value_or_default(&mut self, field: &str) -> Result<Value, OrmError> {
        if let Some(value) = self.values.get(field).filter(|v| !v.is_null()) {
            return Ok(value.clone());
        }
        let descriptor = self.schema.field(field).ok_or_else(|| self.unknown(field))?;
        match descriptor.default_value().resolve() {
            Some(value) => {
                tracing::debug!("using default value for {}: {}", field, value);
                self.values.insert(field.to_string(), value.clone());
                Ok(value)
            }
            None => Ok(Value::Null),
        }
    }

    /// Insert arguments: every non-key field then the key, defaults resolved in that order
    pub fn insert_args(&mut self) -> Result<Vec<Arg>, OrmError> {
        let schema = Arc::clone(&self.schema);
        let mut args = Vec::with_capacity(schema.fields().len() + 1);
        for field in schema.fields() {
            let value = self.resolve_value_or_default(field)?;
            args.push(self.typed_arg(field, value));
        }
        let key = self.resolve_value_or_default(schema.primary_key())?;
        args.push(self.typed_arg(schema.primary_key(), key));
        Ok(args)
    }

    /// Update arguments: current values of every non-key field then the key, no defaults
    pub fn update_args(&self) -> Vec<Arg> {
        self.schema
            .fields()
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.schema.primary_key()))
            .map(|field| self.typed_arg(field, self.value(field)))
            .collect()
    }

    /// The primary key as the single argument of a delete
    pub fn key_args(&self) -> Vec<Arg> {
        vec![self.typed_arg(self.schema.primary_key(), self.primary_key_value())]
    }

    /// Set fields as `(identifier, value)` pairs in identifier order
    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn typed_arg(&self, field: &str, value: Value) -> Arg {
        match self.schema.field(field) {
            Some(descriptor) => Arg::typed(value, descriptor.stored_type()),
            None => Arg::from(value),
        }
    }

    fn check_field(&self, field: &str) -> Result<(), OrmError> {
        if self.schema.contains(field) {
            Ok(())
        } else {
            Err(self.unknown(field))
        }
    }

    fn unknown(&self, field: &str) -> OrmError {
        OrmError::UnknownField {
            type_name: self.schema.type_name().to_string(),
            field: field.to_string(),
        }
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.schema.type_name() == other.schema.type_name() && self.values == other.values
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct(self.schema.type_name());
        for (field, value) in &self.values {
            out.field(field, value);
        }
        out.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldDescriptor;
    use type_mapping::StoredType;

    fn account() -> Arc<Schema> {
        Arc::new(
            Schema::builder("Account")
                .field("id", FieldDescriptor::integer().primary_key())
                .field("owner", FieldDescriptor::string())
                .field("balance", FieldDescriptor::float().default(0.0))
                .field("active", FieldDescriptor::boolean().default(true))
                .register()
                .expect("valid schema"),
        )
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let result = Record::with_values(account(), [("nickname", "x")]);
        assert!(matches!(result, Err(OrmError::UnknownField { .. })));
    }

    #[test]
    fn test_resolve_writes_default_back() {
        let mut record = Record::with_values(account(), [("id", 1)]).expect("record");
        assert_eq!(record.get("balance"), None);
        assert_eq!(record.resolve_value_or_default("balance").expect("value"), Value::Float(0.0));
        assert_eq!(record.get("balance"), Some(&Value::Float(0.0)));
    }

    #[test]
    fn test_resolve_without_default_leaves_record_untouched() {
        let mut record = Record::new(account());
        assert_eq!(record.resolve_value_or_default("owner").expect("value"), Value::Null);
        assert_eq!(record.get("owner"), None);
    }

    #[test]
    fn test_stored_value_wins_over_default() {
        let mut record = Record::with_values(account(), [("balance", 12.5)]).expect("record");
        assert_eq!(record.resolve_value_or_default("balance").expect("value"), Value::Float(12.5));
    }

    #[test]
    fn test_insert_args_follow_field_order_then_key() {
        let mut record = Record::new(account());
        record.set("id", 7).expect("set");
        record.set("owner", "ann").expect("set");
        let values: Vec<Value> = record
            .insert_args()
            .expect("args")
            .into_iter()
            .map(|arg| arg.value)
            .collect();
        assert_eq!(
            values,
            vec![
                Value::from("ann"),
                Value::Float(0.0),
                Value::Boolean(true),
                Value::Integer(7)
            ]
        );
    }

    #[test]
    fn test_update_args_pass_missing_values_as_null() {
        let record = Record::with_values(account(), [("id", 7)]).expect("record");
        assert_eq!(
            record.update_args(),
            vec![
                Arg::typed(Value::Null, StoredType::String),
                Arg::typed(Value::Null, StoredType::Float),
                Arg::typed(Value::Null, StoredType::Boolean),
                Arg::typed(7, StoredType::Integer),
            ]
        );
    }

    #[test]
    fn test_nulls_carry_their_column_type() {
        let record = Record::with_values(account(), [("id", 7)]).expect("record");
        let schema = Arc::new(
            Schema::builder("Note")
                .field("id", FieldDescriptor::integer().primary_key())
                .field("score", FieldDescriptor::float().no_default())
                .register()
                .expect("valid schema"),
        );
        let mut note = Record::with_values(schema, [("id", 1)]).expect("record");

        let args = note.insert_args().expect("args");
        assert_eq!(args[0], Arg::typed(Value::Null, StoredType::Float));
        assert_eq!(record.key_args(), vec![Arg::typed(7, StoredType::Integer)]);
    }

    #[test]
    fn test_from_row_coerces_and_ignores_extra_columns() {
        let mut row = RowMap::new();
        row.insert("id".into(), Value::Integer(3));
        row.insert("balance".into(), Value::Integer(10));
        row.insert("active".into(), Value::Integer(1));
        row.insert("unrelated".into(), Value::from("x"));

        let record = Record::from_row(account(), row);
        assert_eq!(record.get("balance"), Some(&Value::Float(10.0)));
        assert_eq!(record.get("active"), Some(&Value::Boolean(true)));
        assert_eq!(record.get("unrelated"), None);
        assert_eq!(record.primary_key_value(), Value::Integer(3));
    }

    #[test]
    fn test_copies_are_independent() {
        let original = Record::with_values(account(), [("id", 1)]).expect("record");
        let mut copy = original.clone();
        copy.set("owner", "bob").expect("set");
        assert_eq!(original.get("owner"), None);
        assert_ne!(original, copy);
    }
}
