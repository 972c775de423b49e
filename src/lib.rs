//! # minorm
//!
//! A minimal async object-relational mapping layer: declare the fields of a record
//! type once, and get its select/insert/update/delete statements generated and run
//! through a pooled connection against MySQL, PostgreSQL or SQLite.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use minorm::prelude::*;
//!
//! #[derive(Debug, Clone, Serialize, Deserialize, Model)]
//! #[table(name = "users")]
//! pub struct User {
//!     #[field(primary_key, ddl = "varchar(50)", default_with = defaults::uuid_string)]
//!     pub id: Option<String>,
//!     pub email: String,
//!     pub admin: bool,
//!     #[field(default_with = defaults::unix_timestamp)]
//!     pub created_at: Option<f64>,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::new(
//!         Driver::MySql, "localhost".to_string(), 3306, "awesome".to_string(),
//!         "www-data".to_string(), "www-data".to_string(), 1, 10,
//!     );
//!
//!     let mut orm = Minorm::connect(&config).await?;
//!     orm.register_model::<User>()?;
//!     let users = orm.typed_store::<User>()?;
//!
//!     let mut user = User {
//!         id: None,
//!         email: "test@example.com".to_string(),
//!         admin: false,
//!         created_at: None,
//!     };
//!     users.save(&mut user).await?;
//!
//!     let found = users.find(user.id.clone().into()).await?;
//!     println!("Found user: {:?}", found);
//!
//!     orm.close().await;
//!     Ok(())
//! }
//! ```

// Generated `Model` impls name `::minorm::...`, which must also resolve inside this crate
extern crate self as minorm;

pub mod core;
pub mod errors;
pub mod prelude;

// Re-export the main public types for convenience
pub use self::core::Minorm;
pub use errors::MinormError;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, Driver};

// Re-export internal crates used by macros and public API
// These MUST be public for the generated macro code to work correctly
pub use store_object;
pub use table_derive;
pub use type_mapping;

// Re-export external dependencies used in public API
pub use async_trait;
pub use sqlx;
