//! Procedural macros for declaring mapped record types
//!
//! This crate provides the `Model` derive, which turns a struct's fields into the
//! ordered field declarations a schema is registered from.

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod codegen;
mod parsing;

use codegen::generate_model_impl;
use parsing::{parse_field_attributes, parse_table_attributes};

/// Derive macro for the `Model` trait
///
/// The struct must also implement `Serialize` and `Deserialize`. Storage types are
/// inferred from field types (`String`, `bool`, integers, floats and `Option`s of them)
/// unless `kind` overrides them. Non-optional numeric and boolean fields default to
/// zero and `false`; `Option` fields default to `NULL`.
///
/// ```ignore
/// use minorm::prelude::*;
///
/// #[derive(Debug, Clone, Serialize, Deserialize, Model)]
/// #[table(name = "blogs")]
/// pub struct Blog {
///     #[field(primary_key, ddl = "varchar(50)", default_with = defaults::uuid_string)]
///     pub id: Option<String>,
///     pub name: String,
///     #[field(kind = "text")]
///     pub content: String,
///     #[field(default_with = defaults::unix_timestamp)]
///     pub created_at: Option<f64>,
/// }
/// ```
///
/// Declaring zero or several primary keys, repeating a column name or using an
/// unsupported field type is a compile error.
#[proc_macro_derive(Model, attributes(table, field))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let table_info = match parse_table_attributes(&input.attrs) {
        Ok(attrs) => attrs,
        Err(e) => return e.to_compile_error().into(),
    };

    let field_info = match parse_field_attributes(&input) {
        Ok(info) => info,
        Err(e) => return e.to_compile_error().into(),
    };

    TokenStream::from(generate_model_impl(&input.ident, &table_info, &field_info))
}
