//! Unified type mapping between Rust values and stored column values
//! This crate provides the mapping logic shared by the runtime and the `Model` derive

pub mod serialize;
pub mod sql;
pub mod types;

pub use serialize::{json_object_to_values, values_to_json_object};
pub use sql::{is_optional_type, rust_type_to_stored_type};
pub use types::{StoredType, Value};
