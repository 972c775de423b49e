//! Connection pool
//!
//! A thin lifecycle manager over sqlx's pool for the `Any` driver: it opens `min`
//! connections eagerly, bounds growth at `max`, hands out scoped connections that
//! return to the pool when dropped, and refuses new acquisitions once closed while
//! letting in-flight work finish.

use std::ops::{Deref, DerefMut};
use std::time::Duration;

use config::DatabaseConfig;
use sqlx::any::{install_default_drivers, AnyPoolOptions};
use sqlx::pool::PoolConnection;
use sqlx::{Any, AnyConnection, AnyPool, Executor as _};

use crate::dialect::Dialect;
use crate::errors::OrmError;

/// Handle to a bounded set of connections to one database.
///
/// Cloning is cheap and every clone refers to the same connections.
#[derive(Debug, Clone)]
pub struct Pool {
    inner: AnyPool,
    dialect: Dialect,
    min_size: u32,
    max_size: u32,
}

/// Exclusive use of one pooled connection; released on drop
pub struct PooledConnection {
    conn: PoolConnection<Any>,
}

impl std::fmt::Debug for PooledConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PooledConnection").finish_non_exhaustive()
    }
}

impl Deref for PooledConnection {
    type Target = AnyConnection;

    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}

impl DerefMut for PooledConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.conn
    }
}

impl Pool {
    /// Connect and establish `min_connections` connections up front
    pub async fn open(config: &DatabaseConfig) -> Result<Self, OrmError> {
        config
            .validate()
            .map_err(|e| OrmError::Connection(sqlx::Error::Configuration(Box::new(e))))?;
        install_default_drivers();

        let dialect = Dialect::from(config.driver);
        tracing::info!(
            "create database connection pool ({} {}@{}/{}, min {}, max {})",
            config.driver,
            config.user,
            config.host,
            config.database,
            config.min_connections,
            config.max_connections
        );

        let mut options = AnyPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds));

        // Set max lifetime if specified
        options = if config.max_lifetime_seconds > 0 {
            options.max_lifetime(Duration::from_secs(config.max_lifetime_seconds))
        } else {
            options.max_lifetime(None)
        };

        if dialect == Dialect::MySql {
            let statement = if config.autocommit {
                "SET autocommit = 1"
            } else {
                "SET autocommit = 0"
            };
            options = options.after_connect(move |conn, _meta| {
                Box::pin(async move {
                    conn.execute(statement).await?;
                    Ok(())
                })
            });
        } else {
            crate::debug_log!(
                "charset {} and autocommit {} are only applied on mysql",
                config.charset,
                config.autocommit
            );
        }

        let inner = options
            .connect(&config.connection_url())
            .await
            .map_err(OrmError::Connection)?;

        let warm = futures::future::try_join_all(
            (0..config.min_connections).map(|_| inner.acquire()),
        )
        .await;
        if let Err(e) = warm {
            inner.close().await;
            return Err(OrmError::Connection(e));
        }

        Ok(Self {
            inner,
            dialect,
            min_size: config.min_connections,
            max_size: config.max_connections,
        })
    }

    /// Wait for a free connection, or for room to open one.
    ///
    /// Suspends only the calling task. Fails with [`OrmError::PoolClosed`] after
    /// [`Pool::close`] and with [`OrmError::Connection`] on timeout or connect failure.
    pub async fn acquire(&self) -> Result<PooledConnection, OrmError> {
        if self.inner.is_closed() {
            return Err(OrmError::PoolClosed);
        }
        let conn = self.inner.acquire().await.map_err(OrmError::acquire)?;
        Ok(PooledConnection { conn })
    }

    /// Acquire a connection with a transaction already open on it
    pub async fn begin(&self) -> Result<sqlx::Transaction<'static, Any>, OrmError> {
        if self.inner.is_closed() {
            return Err(OrmError::PoolClosed);
        }
        self.inner.begin().await.map_err(OrmError::acquire)
    }

    /// Refuse new acquisitions, wait for checked-out connections and close them all
    pub async fn close(&self) {
        tracing::info!("close database connection pool...");
        self.inner.close().await;
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Open connections, idle or in use
    pub fn size(&self) -> u32 {
        self.inner.size()
    }

    pub fn num_idle(&self) -> usize {
        self.inner.num_idle()
    }

    pub fn min_size(&self) -> u32 {
        self.min_size
    }

    pub fn max_size(&self) -> u32 {
        self.max_size
    }
}
