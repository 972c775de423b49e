//! Convenience re-exports for common minorm usage
//!
//! # Example
//!
//! ```rust
//! use minorm::prelude::*;
//!
//! let account = FieldDescriptor::float().default(0.0);
//! assert_eq!(account.stored_type(), StoredType::Float);
//! ```

// Core components
pub use crate::core::Minorm;
pub use crate::errors::MinormError;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, Driver};

// Re-export commonly used store-object types for convenience
pub use store_object::prelude::*;

// Re-export store_object module for macro-generated code
pub use store_object;

// Re-export table derive for model creation
pub use table_derive::Model;

// Common external dependencies
pub use anyhow;
pub use async_trait;
pub use sqlx;
pub use tokio;
