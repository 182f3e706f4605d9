use std::sync::Arc;

use serde_json::Value as JsonValue;
use sqlx_sqlite_pool::{ConnectionPool, PoolConfig};

use crate::Error;
use crate::builders::{ExecuteBuilder, SelectBuilder};

/// Handle to a connection pool that runs parameterized statements.
///
/// This is the statement executor every mapped record goes through. It is
/// cheap to clone; clones share the same pool.
///
/// Statements are written with the generic `?` marker. Each `?` is rewritten
/// to SQLite's numbered form before the statement is sent.
#[derive(Clone, Debug)]
pub struct Database {
   pool: Arc<ConnectionPool>,
}

impl Database {
   /// Initialize a pool from `config` and wrap it.
   ///
   /// # Examples
   ///
   /// ```no_run
   /// # async fn example() -> Result<(), sqlx_sqlite_orm::Error> {
   /// use sqlx_sqlite_orm::{Database, PoolConfig};
   ///
   /// let db = Database::connect(PoolConfig::new("/tmp/blog.db")).await?;
   /// # Ok(())
   /// # }
   /// ```
   pub async fn connect(config: PoolConfig) -> Result<Self, Error> {
      let pool = ConnectionPool::initialize(config).await?;
      Ok(Self { pool })
   }

   /// Wrap a pool the application already owns.
   pub fn from_pool(pool: Arc<ConnectionPool>) -> Self {
      Self { pool }
   }

   pub fn pool(&self) -> &Arc<ConnectionPool> {
      &self.pool
   }

   /// Create a builder for a read-only SELECT.
   ///
   /// # Examples
   ///
   /// ```no_run
   /// # async fn example(db: &sqlx_sqlite_orm::Database) -> Result<(), sqlx_sqlite_orm::Error> {
   /// use serde_json::json;
   ///
   /// let rows = db
   ///     .select("select name from users where age > ?", vec![json!(21)])
   ///     .limit(10)
   ///     .await?;
   ///
   /// for row in &rows {
   ///     println!("{}", row["name"]);
   /// }
   /// # Ok(())
   /// # }
   /// ```
   pub fn select(&self, sql: impl Into<String>, args: Vec<JsonValue>) -> SelectBuilder {
      SelectBuilder::new(Arc::clone(&self.pool), sql.into(), args)
   }

   /// Create a builder for one INSERT/UPDATE/DELETE statement.
   ///
   /// The statement uses the pool's autocommit default unless
   /// [`ExecuteBuilder::autocommit`] overrides it.
   ///
   /// # Examples
   ///
   /// ```no_run
   /// # async fn example(db: &sqlx_sqlite_orm::Database) -> Result<(), sqlx_sqlite_orm::Error> {
   /// use serde_json::json;
   ///
   /// let affected = db
   ///     .execute("update users set admin = ? where id = ?", vec![json!(true), json!(7)])
   ///     .autocommit(false)
   ///     .await?;
   ///
   /// assert_eq!(affected, 1);
   /// # Ok(())
   /// # }
   /// ```
   pub fn execute(&self, sql: impl Into<String>, args: Vec<JsonValue>) -> ExecuteBuilder {
      ExecuteBuilder::new(Arc::clone(&self.pool), sql.into(), args)
   }

   /// Close the underlying pool, waiting for checked-out connections.
   pub async fn close(&self) {
      self.pool.close().await;
   }
}
