//! Parsing utilities for table and field attributes
//!
//! This module handles the parsing of `#[table]` and `#[field]` attributes
//! and validation of table and column names.

use std::collections::HashSet;

use quote::quote;
use syn::ext::IdentExt;
use syn::{Attribute, Data, Error, Expr, Fields, Ident, LitStr, Path, Result};
use type_mapping::{is_optional_type, rust_type_to_stored_type, StoredType};

/// Identifier length limit, same as the runtime check
const MAX_IDENTIFIER_LENGTH: usize = 64;

/// Validate table name and return syn::Error for better proc macro error handling
pub fn validate_table_name_syn(name: &str, span: proc_macro2::Span) -> Result<()> {
    validate_identifier(name)
        .map_err(|e| Error::new(span, format!("Invalid table name '{}': {}", name, e)))
}

/// Validate column name and return syn::Error for better proc macro error handling
pub fn validate_column_name_syn(name: &str, span: proc_macro2::Span) -> Result<()> {
    validate_identifier(name)
        .map_err(|e| Error::new(span, format!("Invalid column name '{}': {}", name, e)))
}

/// Validation logic that mirrors store_object::validation
/// This ensures compile-time validation matches runtime validation
fn validate_identifier(name: &str) -> std::result::Result<(), String> {
    let first_char = name
        .chars()
        .next()
        .ok_or_else(|| "Name cannot be empty".to_string())?;

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(format!(
            "Name '{}' is too long: {} characters (max {})",
            name,
            name.len(),
            MAX_IDENTIFIER_LENGTH
        ));
    }

    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(format!(
            "Name '{}' must start with a letter or underscore",
            name
        ));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!("Name '{}' contains invalid characters: only alphanumeric characters and underscores are allowed", name));
    }

    Ok(())
}

#[derive(Debug)]
pub struct TableInfo {
    /// Explicit `#[table(name = "...")]`; the struct name is used otherwise
    pub name: Option<String>,
}

pub enum DefaultSpec {
    /// Storage type's implicit default
    Implicit,
    /// No default at all
    None,
    Value(Expr),
    Provider(Path),
}

pub struct FieldInfo {
    pub ident: Ident,
    pub stored_type: StoredType,
    pub column: Option<String>,
    pub ddl: Option<String>,
    pub primary_key: bool,
    pub default: DefaultSpec,
}

impl FieldInfo {
    /// Identifier records use for this field
    pub fn identifier(&self) -> String {
        self.ident.unraw().to_string()
    }

    pub fn column_name(&self) -> String {
        self.column.clone().unwrap_or_else(|| self.identifier())
    }
}

pub fn parse_table_attributes(attrs: &[Attribute]) -> Result<TableInfo> {
    let mut name = None;

    for attr in attrs {
        if !attr.path().is_ident("table") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                validate_table_name_syn(&value.value(), value.span())?;
                name = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported table attribute, expected `name`"))
            }
        })?;
    }

    Ok(TableInfo { name })
}

pub fn parse_field_attributes(input: &syn::DeriveInput) -> Result<Vec<FieldInfo>> {
    let fields_named = match &input.data {
        Data::Struct(data_struct) => match &data_struct.fields {
            Fields::Named(fields_named) => fields_named,
            _ => {
                return Err(Error::new_spanned(
                    &input.ident,
                    "Model can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new_spanned(
                &input.ident,
                "Model can only be derived for structs",
            ))
        }
    };

    let mut infos = Vec::new();
    let mut columns = HashSet::new();

    for field in &fields_named.named {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| Error::new_spanned(field, "Field must have a name"))?;

        let ty = &field.ty;
        let type_string = quote!(#ty).to_string().replace(' ', "");
        let optional = is_optional_type(&type_string);

        let mut info = FieldInfo {
            ident: ident.clone(),
            stored_type: StoredType::String,
            column: None,
            ddl: None,
            primary_key: false,
            default: if optional {
                DefaultSpec::None
            } else {
                DefaultSpec::Implicit
            },
        };
        let mut kind: Option<StoredType> = None;

        for attr in field.attrs.iter().filter(|a| a.path().is_ident("field")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("primary_key") {
                    info.primary_key = true;
                } else if meta.path.is_ident("name") {
                    let value: LitStr = meta.value()?.parse()?;
                    info.column = Some(value.value());
                } else if meta.path.is_ident("ddl") {
                    let value: LitStr = meta.value()?.parse()?;
                    info.ddl = Some(value.value());
                } else if meta.path.is_ident("kind") {
                    let value: LitStr = meta.value()?.parse()?;
                    kind = Some(
                        value
                            .value()
                            .parse()
                            .map_err(|e: String| Error::new(value.span(), e))?,
                    );
                } else if meta.path.is_ident("default") {
                    info.default = DefaultSpec::Value(meta.value()?.parse()?);
                } else if meta.path.is_ident("default_with") {
                    info.default = DefaultSpec::Provider(meta.value()?.parse()?);
                } else if meta.path.is_ident("no_default") {
                    info.default = DefaultSpec::None;
                } else {
                    return Err(meta.error(
                        "unsupported field attribute, expected one of `primary_key`, `name`, `ddl`, `kind`, `default`, `default_with`, `no_default`",
                    ));
                }
                Ok(())
            })?;
        }

        info.stored_type = match kind {
            Some(kind) => kind,
            None => rust_type_to_stored_type(&type_string).ok_or_else(|| {
                Error::new_spanned(
                    ty,
                    format!(
                        "unsupported field type `{}`: use String, bool, an integer, a float or an Option of those",
                        type_string
                    ),
                )
            })?,
        };

        let column = info.column_name();
        validate_column_name_syn(&column, ident.span())?;
        if !columns.insert(column.clone()) {
            return Err(Error::new(
                ident.span(),
                format!("duplicate column '{}'", column),
            ));
        }

        infos.push(info);
    }

    let mut keys = infos.iter().filter(|f| f.primary_key);
    match (keys.next(), keys.next()) {
        (Some(_), None) => Ok(infos),
        (None, _) => Err(Error::new_spanned(
            &input.ident,
            "primary key not found: mark exactly one field with #[field(primary_key)]",
        )),
        (Some(_), Some(second)) => Err(Error::new(
            second.ident.span(),
            format!("duplicate primary key for field: {}", second.identifier()),
        )),
    }
}
