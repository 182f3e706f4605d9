//! Bounded SQLite connection pool

use crate::Result;
use crate::config::PoolConfig;
use crate::error::Error;
use crate::guard::PooledConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{info, warn};

/// An owned pool of SQLite connections.
///
/// Created once during process start-up with [`ConnectionPool::initialize`] and
/// passed by `Arc` to everything that needs a connection. All checkouts go
/// through sqlx's pool, which queues waiters fairly and never hands the same
/// physical connection to two callers.
///
/// # Example
///
/// ```no_run
/// use sqlx_sqlite_pool::{ConnectionPool, PoolConfig};
///
/// # async fn example() -> Result<(), sqlx_sqlite_pool::Error> {
/// let pool = ConnectionPool::initialize(PoolConfig {
///     database: "blog.db".into(),
///     max_connections: 4,
///     ..Default::default()
/// })
/// .await?;
///
/// let mut conn = pool.acquire().await?;
/// sqlx::query("SELECT 1").execute(&mut *conn).await?;
/// drop(conn);
///
/// pool.close().await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConnectionPool {
   pool: Pool<Sqlite>,

   config: PoolConfig,

   /// Set by `close()`; later checkouts fail with `PoolClosed`
   closed: AtomicBool,
}

impl ConnectionPool {
   /// Validate `config` and open the pool
   ///
   /// At least one connection is opened eagerly so a bad path or unreadable
   /// file is reported here rather than on first use.
   pub async fn initialize(config: PoolConfig) -> Result<Arc<Self>> {
      config.validate()?;

      info!(
         "create database connection pool for {} (min {}, max {})",
         config.database.display(),
         config.min_connections,
         config.max_connections
      );

      if is_memory_database(&config) && config.max_connections > 1 {
         warn!("every connection to :memory: opens a separate empty database");
      }

      let options = SqliteConnectOptions::new()
         .filename(&config.database)
         .create_if_missing(config.create_if_missing);

      let pool = SqlitePoolOptions::new()
         .max_connections(config.max_connections)
         .min_connections(config.min_connections)
         .acquire_timeout(config.acquire_timeout())
         .idle_timeout(Some(Duration::from_secs(config.idle_timeout_secs)))
         .connect_with(options)
         .await?;

      Ok(Arc::new(Self {
         pool,
         config,
         closed: AtomicBool::new(false),
      }))
   }

   /// Check out a connection, waiting until one is free
   ///
   /// Waits cooperatively for at most `acquire_timeout_secs`; after that the
   /// call fails with `sqlx::Error::PoolTimedOut`. With no timeout configured
   /// it waits until another holder releases a connection.
   pub async fn acquire(&self) -> Result<PooledConnection> {
      if self.is_closed() {
         return Err(Error::PoolClosed);
      }

      let conn = self.pool.acquire().await.map_err(|e| match e {
         sqlx::Error::PoolClosed => Error::PoolClosed,
         other => Error::Sqlx(other),
      })?;

      Ok(PooledConnection::new(conn))
   }

   /// Close the pool
   ///
   /// Waits for every checked-out connection to come back, then closes them
   /// all. Checkouts attempted afterwards fail with [`Error::PoolClosed`].
   pub async fn close(&self) {
      if self.closed.swap(true, Ordering::SeqCst) {
         return;
      }
      info!("close database connection pool");
      self.pool.close().await;
   }

   pub fn is_closed(&self) -> bool {
      self.closed.load(Ordering::SeqCst)
   }

   /// Connections currently open, idle and checked out together
   pub fn size(&self) -> u32 {
      self.pool.size()
   }

   /// Connections open and waiting in the pool
   pub fn num_idle(&self) -> usize {
      self.pool.num_idle()
   }

   pub fn config(&self) -> &PoolConfig {
      &self.config
   }

   /// Whether mutations skip explicit transactions unless told otherwise
   pub fn autocommit_default(&self) -> bool {
      self.config.autocommit
   }
}

fn is_memory_database(config: &PoolConfig) -> bool {
   config.database.as_os_str() == ":memory:"
}
