//! Schema registry entries
//!
//! A [`Schema`] is derived once per mapped type from its declared fields: table name,
//! primary key, ordered non-key fields, and the generated statement templates. It is
//! never mutated afterwards and is shared (behind an `Arc`) by every record of the type.

use std::collections::{HashMap, HashSet};

use crate::errors::OrmError;
use crate::field::FieldDescriptor;
use crate::sql_generation::{quote_identifier, SqlTemplates};
use crate::validation::validate_identifier;

/// Immutable, derived table metadata of one mapped type
#[derive(Debug, Clone)]
pub struct Schema {
    type_name: String,
    table_name: String,
    primary_key: String,
    fields: Vec<String>,
    mappings: HashMap<String, FieldDescriptor>,
    templates: SqlTemplates,
}

/// Collects field declarations before registration
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    type_name: String,
    table_name: Option<String>,
    fields: Vec<(String, FieldDescriptor)>,
}

impl SchemaBuilder {
    /// Override the table name (defaults to the type name)
    pub fn table(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    /// Declare a field; declaration order fixes column and argument order
    pub fn field(mut self, identifier: impl Into<String>, descriptor: FieldDescriptor) -> Self {
        self.fields.push((identifier.into(), descriptor));
        self
    }

    pub fn register(self) -> Result<Schema, OrmError> {
        Schema::register(&self.type_name, self.fields, self.table_name.as_deref())
    }
}

impl Schema {
    pub fn builder(type_name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            type_name: type_name.into(),
            table_name: None,
            fields: Vec::new(),
        }
    }

    /// Derive the registry entry of a type from its declared fields.
    ///
    /// Fails when the fields do not declare exactly one primary key, when an identifier
    /// or column name repeats, or when a name is not a plain identifier.
    pub fn register<I, S>(
        type_name: &str,
        declared: I,
        table_name: Option<&str>,
    ) -> Result<Schema, OrmError>
    where
        I: IntoIterator<Item = (S, FieldDescriptor)>,
        S: Into<String>,
    {
        let table_name = table_name.unwrap_or(type_name).to_string();
        validate_identifier(&table_name)
            .map_err(|e| OrmError::schema(format!("invalid table name for {}: {}", type_name, e)))?;

        let mut mappings = HashMap::new();
        let mut fields = Vec::new();
        let mut primary_key: Option<String> = None;
        let mut columns = HashSet::new();

        for (identifier, descriptor) in declared {
            let identifier = identifier.into();
            validate_identifier(&identifier).map_err(|e| {
                OrmError::schema(format!("invalid field identifier on {}: {}", type_name, e))
            })?;

            let column = descriptor.explicit_name().unwrap_or(&identifier).to_string();
            validate_identifier(&column)
                .map_err(|e| OrmError::schema(format!("invalid column name on {}: {}", type_name, e)))?;
            if !columns.insert(column.clone()) {
                return Err(OrmError::schema(format!(
                    "duplicate column '{}' on {}",
                    column, type_name
                )));
            }

            if descriptor.is_primary_key() {
                if let Some(existing) = &primary_key {
                    return Err(OrmError::schema(format!(
                        "duplicate primary key for field: {} (already {}) on {}",
                        identifier, existing, type_name
                    )));
                }
                primary_key = Some(identifier.clone());
            } else {
                fields.push(identifier.clone());
            }

            if mappings.insert(identifier.clone(), descriptor).is_some() {
                return Err(OrmError::schema(format!(
                    "duplicate field '{}' on {}",
                    identifier, type_name
                )));
            }
        }

        let primary_key = primary_key
            .ok_or_else(|| OrmError::schema(format!("primary key not found on {}", type_name)))?;

        tracing::info!("found model: {} (table: {})", type_name, table_name);
        for identifier in std::iter::once(&primary_key).chain(&fields) {
            if let Some(descriptor) = mappings.get(identifier) {
                tracing::debug!("  found mapping: {} ==> {}", identifier, descriptor);
            }
        }

        let column_of = |identifier: &str| -> String {
            mappings
                .get(identifier)
                .and_then(|d: &FieldDescriptor| d.explicit_name())
                .unwrap_or(identifier)
                .to_string()
        };
        let pk_column = column_of(&primary_key);
        let field_columns: Vec<String> = fields.iter().map(|f| column_of(f)).collect();
        let column_refs: Vec<&str> = field_columns.iter().map(String::as_str).collect();
        let templates = SqlTemplates::build(&table_name, &pk_column, &column_refs);

        Ok(Schema {
            type_name: type_name.to_string(),
            table_name,
            primary_key,
            fields,
            mappings,
            templates,
        })
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Identifier of the primary-key field
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    /// Non-key field identifiers in declaration order
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Every identifier, primary key first, then the other fields in order
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary_key.as_str()).chain(self.fields.iter().map(String::as_str))
    }

    pub fn field(&self, identifier: &str) -> Option<&FieldDescriptor> {
        self.mappings.get(identifier)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.mappings.contains_key(identifier)
    }

    /// Column name a field is stored under
    pub fn column_name<'a>(&'a self, identifier: &'a str) -> Option<&'a str> {
        self.mappings
            .get(identifier)
            .map(|descriptor| descriptor.explicit_name().unwrap_or(identifier))
    }

    pub fn templates(&self) -> &SqlTemplates {
        &self.templates
    }

    pub fn select_sql(&self) -> &str {
        &self.templates.select
    }

    pub fn insert_sql(&self) -> &str {
        &self.templates.insert
    }

    pub fn update_sql(&self) -> &str {
        &self.templates.update
    }

    pub fn delete_sql(&self) -> &str {
        &self.templates.delete
    }

    /// Quoted primary-key column, for `where` clauses
    pub fn quoted_primary_key(&self) -> String {
        quote_identifier(self.column_name(&self.primary_key).unwrap_or(&self.primary_key))
    }
}
