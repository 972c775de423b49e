//! Rust type to storage type mapping
//!
//! Used by the `Model` derive to infer a field's storage type from its declared Rust type.

use crate::types::StoredType;

/// Map a Rust type name (as written in a struct, whitespace ignored) to a storage type
pub fn rust_type_to_stored_type(rust_type: &str) -> Option<StoredType> {
    let normalized = rust_type.replace(' ', "");
    let inner = strip_option(&normalized);
    match inner {
        "String" | "std::string::String" | "&str" | "&'staticstr" => Some(StoredType::String),
        "bool" => Some(StoredType::Boolean),
        "i8" | "i16" | "i32" | "i64" | "u8" | "u16" | "u32" | "isize" => Some(StoredType::Integer),
        "f32" | "f64" => Some(StoredType::Float),
        _ => None,
    }
}

/// Check if a Rust type is Optional (nullable in SQL)
pub fn is_optional_type(rust_type: &str) -> bool {
    let normalized = rust_type.replace(' ', "");
    strip_option(&normalized).len() != normalized.len()
}

fn strip_option(normalized: &str) -> &str {
    ["Option<", "std::option::Option<", "core::option::Option<"]
        .iter()
        .find_map(|prefix| {
            normalized
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_suffix('>'))
        })
        .unwrap_or(normalized)
}
