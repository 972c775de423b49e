//! Field descriptors
//!
//! A descriptor is the declarative metadata of one mapped column: storage type,
//! primary-key flag, optional column name override and default value or provider.

use std::fmt;
use std::sync::Arc;
use type_mapping::{StoredType, Value};

/// Zero-argument function producing a default value at save time
pub type DefaultProvider = Arc<dyn Fn() -> Value + Send + Sync>;

/// Default applied to a field that has no value when its record is saved
#[derive(Clone, Default)]
pub enum FieldDefault {
    #[default]
    Absent,
    Value(Value),
    Provider(DefaultProvider),
}

impl FieldDefault {
    /// Evaluate the default, invoking the provider if there is one
    pub fn resolve(&self) -> Option<Value> {
        match self {
            FieldDefault::Absent => None,
            FieldDefault::Value(value) => Some(value.clone()),
            FieldDefault::Provider(provider) => Some(provider()),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, FieldDefault::Absent)
    }
}

impl fmt::Debug for FieldDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldDefault::Absent => f.write_str("Absent"),
            FieldDefault::Value(value) => f.debug_tuple("Value").field(value).finish(),
            FieldDefault::Provider(_) => f.write_str("Provider(..)"),
        }
    }
}

/// Immutable mapping metadata for one column
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: Option<String>,
    stored_type: StoredType,
    column_type: String,
    primary_key: bool,
    default: FieldDefault,
}

impl FieldDescriptor {
    /// Descriptor with the storage type's implicit default and DDL
    pub fn new(stored_type: StoredType) -> Self {
        Self {
            name: None,
            stored_type,
            column_type: stored_type.default_ddl().to_string(),
            primary_key: false,
            default: stored_type
                .implicit_default()
                .map(FieldDefault::Value)
                .unwrap_or_default(),
        }
    }

    /// `varchar(100)` column, no default
    pub fn string() -> Self {
        Self::new(StoredType::String)
    }

    /// `tinyint(1)` column, defaults to `false`
    pub fn boolean() -> Self {
        Self::new(StoredType::Boolean)
    }

    /// `bigint` column, defaults to `0`
    pub fn integer() -> Self {
        Self::new(StoredType::Integer)
    }

    /// `real` column, defaults to `0.0`
    pub fn float() -> Self {
        Self::new(StoredType::Float)
    }

    /// `text` column, no default
    pub fn text() -> Self {
        Self::new(StoredType::Text)
    }

    /// Column name, when it differs from the declaring identifier
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = FieldDefault::Value(value.into());
        self
    }

    pub fn default_with<F, V>(mut self, provider: F) -> Self
    where
        F: Fn() -> V + Send + Sync + 'static,
        V: Into<Value>,
    {
        self.default = FieldDefault::Provider(Arc::new(move || provider().into()));
        self
    }

    pub fn no_default(mut self) -> Self {
        self.default = FieldDefault::Absent;
        self
    }

    pub fn ddl(mut self, column_type: impl Into<String>) -> Self {
        self.column_type = column_type.into();
        self
    }

    pub fn explicit_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn stored_type(&self) -> StoredType {
        self.stored_type
    }

    pub fn column_type(&self) -> &str {
        &self.column_type
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub fn default_value(&self) -> &FieldDefault {
        &self.default
    }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{}, {}:{}>",
            self.stored_type,
            self.column_type,
            self.name.as_deref().unwrap_or("-")
        )
    }
}
