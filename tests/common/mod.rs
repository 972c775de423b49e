//! Shared setup for integration tests
//!
//! Every test gets its own SQLite database file inside a temporary directory, opened
//! through the same `Any` driver path used for MySQL and PostgreSQL.

#![allow(dead_code)]

use minorm::prelude::*;
use tempfile::TempDir;

pub const ACCOUNTS_DDL: &str = "create table `accounts` (
    `id` bigint not null primary key,
    `owner` varchar(100),
    `balance` real not null
)";

pub const BLOGS_DDL: &str = "create table `blogs` (
    `id` varchar(50) not null primary key,
    `user_id` varchar(50) not null,
    `title` varchar(50) not null,
    `content` text not null,
    `published` tinyint(1) not null,
    `created_at` real not null
)";

/// Keeps the database directory alive for the duration of a test
pub struct TestDb {
    pub orm: Minorm,
    _dir: TempDir,
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn sqlite_config(dir: &TempDir, min: u32, max: u32) -> DatabaseConfig {
    let path = dir.path().join("test.db");
    DatabaseConfig::sqlite(path.to_string_lossy().into_owned(), min, max)
}

pub async fn setup(ddl: &[&str]) -> TestDb {
    init_tracing();
    let dir = TempDir::new().expect("Failed to create temp dir");
    let orm = Minorm::connect(&sqlite_config(&dir, 1, 4))
        .await
        .expect("Failed to open database");

    for statement in ddl {
        orm.executor()
            .execute(statement, &[], false)
            .await
            .expect("Failed to create table");
    }

    TestDb { orm, _dir: dir }
}

pub fn account_schema() -> Schema {
    Schema::builder("Account")
        .table("accounts")
        .field("id", FieldDescriptor::integer().primary_key())
        .field("owner", FieldDescriptor::string())
        .field("balance", FieldDescriptor::float().default(0.0))
        .register()
        .expect("valid schema")
}
