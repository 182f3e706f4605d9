//! Scoped checkout of a pooled connection

use sqlx::Sqlite;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::SqliteConnection;
use std::ops::{Deref, DerefMut};

/// RAII guard over one connection checked out of a [`ConnectionPool`](crate::ConnectionPool)
///
/// The connection goes back to the pool when the guard is dropped, whether the
/// holder returned normally, bailed out with `?`, or had its future cancelled.
///
/// The guard derefs to `SqliteConnection` so it can be handed straight to sqlx.
///
/// # Example
///
/// ```no_run
/// use sqlx_sqlite_pool::{ConnectionPool, PoolConfig};
///
/// # async fn example() -> Result<(), sqlx_sqlite_pool::Error> {
/// let pool = ConnectionPool::initialize(PoolConfig::new("app.db")).await?;
/// let mut conn = pool.acquire().await?;
/// sqlx::query("DELETE FROM sessions")
///     .execute(&mut *conn)
///     .await?;
/// // Connection is returned here
/// drop(conn);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PooledConnection {
   conn: PoolConnection<Sqlite>,
}

impl PooledConnection {
   pub(crate) fn new(conn: PoolConnection<Sqlite>) -> Self {
      Self { conn }
   }
}

impl Deref for PooledConnection {
   type Target = SqliteConnection;

   fn deref(&self) -> &Self::Target {
      &self.conn
   }
}

impl DerefMut for PooledConnection {
   fn deref_mut(&mut self) -> &mut Self::Target {
      &mut self.conn
   }
}
