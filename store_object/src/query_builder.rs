//! Query composition on top of a schema's select template
//!
//! Filter and order clauses are raw SQL fragments supplied by the caller, who is also
//! responsible for the values of any `?` they contain. Limits always bind their
//! values through placeholders appended after the caller's arguments.

use crate::errors::OrmError;
use crate::schema::Schema;
use crate::sql_generation::quote_identifier;
use type_mapping::Value;

/// Alias of the single column read by [`build_count`]
pub const COUNT_ALIAS: &str = "_num_";

/// Row limit of a `find_all`: a single bound or an `(offset, count)` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Count(i64),
    Range { offset: i64, count: i64 },
}

impl Limit {
    fn validate(&self) -> Result<(), OrmError> {
        match *self {
            Limit::Count(count) if count < 0 => {
                Err(OrmError::value(format!("Invalid limit value: {}", count)))
            }
            Limit::Range { offset, count } if offset < 0 || count < 0 => Err(OrmError::value(
                format!("Invalid limit value: ({}, {})", offset, count),
            )),
            _ => Ok(()),
        }
    }
}

impl From<i64> for Limit {
    fn from(count: i64) -> Self {
        Limit::Count(count)
    }
}

impl From<(i64, i64)> for Limit {
    fn from((offset, count): (i64, i64)) -> Self {
        Limit::Range { offset, count }
    }
}

impl TryFrom<serde_json::Value> for Limit {
    type Error = OrmError;

    /// Accepts `5` or `[10, 5]`; anything else is a value error
    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        let invalid = || OrmError::value(format!("Invalid limit value: {}", value));
        let limit = match &value {
            serde_json::Value::Number(n) => Limit::Count(n.as_i64().ok_or_else(invalid)?),
            serde_json::Value::Array(items) if items.len() == 2 => {
                let offset = items[0].as_i64().ok_or_else(invalid)?;
                let count = items[1].as_i64().ok_or_else(invalid)?;
                Limit::Range { offset, count }
            }
            _ => return Err(invalid()),
        };
        limit.validate()?;
        Ok(limit)
    }
}

/// Options of a `find_all` query
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    pub filter: Option<String>,
    pub args: Vec<Value>,
    pub order_by: Option<String>,
    pub limit: Option<Limit>,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw `where` clause and the values of its placeholders
    pub fn filter<I, V>(mut self, clause: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.filter = Some(clause.into());
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn order_by(mut self, clause: impl Into<String>) -> Self {
        self.order_by = Some(clause.into());
        self
    }

    pub fn limit(mut self, limit: impl Into<Limit>) -> Self {
        self.limit = Some(limit.into());
        self
    }
}

/// `select ... where pk=?` for a single key
pub fn build_find_by_key(schema: &Schema) -> String {
    format!("{} where {}=?", schema.select_sql(), schema.quoted_primary_key())
}

/// Compose the select template with filter, ordering and limit.
///
/// Fails before producing any SQL when the limit is malformed.
pub fn build_find_all(schema: &Schema, options: &FindOptions) -> Result<(String, Vec<Value>), OrmError> {
    if let Some(limit) = &options.limit {
        limit.validate()?;
    }

    let mut sql = vec![schema.select_sql().to_string()];
    let mut args = options.args.clone();

    if let Some(filter) = &options.filter {
        sql.push("where".to_string());
        sql.push(filter.clone());
    }
    if let Some(order_by) = &options.order_by {
        sql.push("order by".to_string());
        sql.push(order_by.clone());
    }
    match options.limit {
        Some(Limit::Count(count)) => {
            sql.push("limit ?".to_string());
            args.push(Value::Integer(count));
        }
        Some(Limit::Range { offset, count }) => {
            sql.push("limit ?, ?".to_string());
            args.push(Value::Integer(offset));
            args.push(Value::Integer(count));
        }
        None => {}
    }

    Ok((sql.join(" "), args))
}

/// `select <field> _num_ from <table> [where <filter>]`
pub fn build_count(schema: &Schema, select_field: &str, filter: Option<&str>) -> String {
    let mut sql = format!(
        "select {} {} from {}",
        select_field,
        COUNT_ALIAS,
        quote_identifier(schema.table_name())
    );
    if let Some(filter) = filter {
        sql.push_str(" where ");
        sql.push_str(filter);
    }
    sql
}
