//! Error types for the minorm crate
//!
//! This module contains the errors returned by the [`Minorm`](crate::Minorm) coordinator.

use config::ConfigError;
use store_object::OrmError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MinormError {
    #[error(transparent)]
    Orm(#[from] OrmError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Schema already registered: {0}")]
    SchemaAlreadyRegistered(String),

    #[error("Schema not found: {0}")]
    SchemaNotFound(String),
}
