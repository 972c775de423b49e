//! Traits for database operations
//!
//! This module contains the traits that define typed models and the stores that
//! persist them.

pub mod core;
pub mod model;

pub use self::core::StoreObject;
pub use model::Model;
