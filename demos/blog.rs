//! # Blog Example
//!
//! A small blog backend on a throwaway SQLite database:
//! - users and posts declared with `#[derive(Model)]`
//! - generated ids and timestamps filled in on save
//! - filtered, ordered and paged reads plus an aggregate
//! - a transfer of posts between users inside one transaction
//!
//! Run with `RUST_LOG=debug cargo run --example blog --features debug-logging` to see
//! every statement.

use minorm::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Serialize, Deserialize, Model)]
#[table(name = "users")]
pub struct User {
    #[field(primary_key, ddl = "varchar(50)", default_with = defaults::uuid_string)]
    pub id: Option<String>,
    #[field(ddl = "varchar(50)")]
    pub email: String,
    #[field(ddl = "varchar(50)")]
    pub passwd: String,
    pub admin: bool,
    #[field(ddl = "varchar(50)")]
    pub name: String,
    #[field(ddl = "varchar(500)")]
    pub image: Option<String>,
    #[field(default_with = defaults::unix_timestamp)]
    pub created_at: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Model)]
#[table(name = "blogs")]
pub struct Blog {
    #[field(primary_key, ddl = "varchar(50)", default_with = defaults::uuid_string)]
    pub id: Option<String>,
    #[field(ddl = "varchar(50)")]
    pub user_id: String,
    #[field(ddl = "varchar(50)")]
    pub name: String,
    #[field(ddl = "varchar(200)")]
    pub summary: String,
    #[field(kind = "text")]
    pub content: String,
    #[field(default_with = defaults::unix_timestamp)]
    pub created_at: Option<f64>,
}

const SCHEMA: &[&str] = &[
    "create table `users` (
        `id` varchar(50) not null primary key,
        `email` varchar(50) not null,
        `passwd` varchar(50) not null,
        `admin` tinyint(1) not null,
        `name` varchar(50) not null,
        `image` varchar(500),
        `created_at` real not null
    )",
    "create table `blogs` (
        `id` varchar(50) not null primary key,
        `user_id` varchar(50) not null,
        `name` varchar(50) not null,
        `summary` varchar(200) not null,
        `content` text not null,
        `created_at` real not null
    )",
];

fn user(name: &str, admin: bool) -> User {
    User {
        id: None,
        email: format!("{}@example.com", name),
        passwd: "1234567890".to_string(),
        admin,
        name: name.to_string(),
        image: None,
        created_at: None,
    }
}

fn post(author: &User, name: &str) -> anyhow::Result<Blog> {
    Ok(Blog {
        id: None,
        user_id: author
            .id
            .clone()
            .ok_or_else(|| anyhow::anyhow!("author {} is not saved yet", author.name))?,
        name: name.to_string(),
        summary: format!("About {}", name),
        content: format!("Everything about {}.", name),
        created_at: None,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("blog.db");
    let config = DatabaseConfig::sqlite(path.to_string_lossy(), 1, 5);

    let mut orm = Minorm::connect(&config).await?;
    for ddl in SCHEMA {
        orm.executor().execute(ddl, &[], false).await?;
    }
    orm.register_model::<User>()?;
    orm.register_model::<Blog>()?;
    orm.health_check().await?;

    let users = orm.typed_store::<User>()?;
    let blogs = orm.typed_store::<Blog>()?;

    let mut alice = user("alice", true);
    let mut bob = user("bob", false);
    users.save(&mut alice).await?;
    users.save(&mut bob).await?;
    println!("Created users {:?} and {:?}", alice.id, bob.id);

    for name in ["Learning Rust", "Async pools", "Schema registries"] {
        let mut blog = post(&alice, name)?;
        blogs.save(&mut blog).await?;
    }
    let mut blog = post(&bob, "Hello world")?;
    blogs.save(&mut blog).await?;

    let page = blogs
        .find_all(
            FindOptions::new()
                .filter("`user_id`=?", [alice.id.clone()])
                .order_by("`name`")
                .limit((0i64, 2i64)),
        )
        .await?;
    for blog in &page {
        println!("alice wrote: {}", blog.name);
    }

    let total = blogs.count_where("count(`id`)", None, Vec::new()).await?;
    println!("Total posts: {}", total.unwrap_or_default());

    // Hand alice's posts to bob atomically
    let mut tx = orm.begin().await?;
    let moved = tx
        .execute(
            "update `blogs` set `user_id`=? where `user_id`=?",
            &[bob.id.clone().into(), alice.id.clone().into()],
        )
        .await?;
    tx.commit().await?;
    println!("Moved {} posts to bob", moved);

    bob.image = Some("https://example.com/bob.png".to_string());
    let outcome = users.update(&bob).await?;
    println!("Updated bob: {} row(s)", outcome.affected);

    if let Some(found) = users.find(alice.id.clone().into()).await? {
        users.remove(&found).await?;
        println!("Removed {}", found.name);
    }

    // A missing row is reported, not raised, under the default policy
    let outcome = users.remove(&alice).await?;
    println!("Second remove affected {} row(s)", outcome.affected);

    orm.close().await;
    Ok(())
}
