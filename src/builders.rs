//! Statement builders for reads and writes

use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::Arc;

use futures::TryStreamExt;
use serde_json::Value as JsonValue;
use sqlx::Connection;
use sqlx_sqlite_pool::ConnectionPool;
use tracing::{debug, error, info};

use crate::Error;
use crate::decode::{Row, decode_row};
use crate::placeholder;

/// Builder for SELECT statements
pub struct SelectBuilder {
   pool: Arc<ConnectionPool>,
   sql: String,
   args: Vec<JsonValue>,
   limit: Option<usize>,
}

impl SelectBuilder {
   pub(crate) fn new(pool: Arc<ConnectionPool>, sql: String, args: Vec<JsonValue>) -> Self {
      Self {
         pool,
         sql,
         args,
         limit: None,
      }
   }

   /// Return at most `n` rows; the rest of the result set is never read
   pub fn limit(mut self, n: usize) -> Self {
      self.limit = Some(n);
      self
   }

   /// Run the statement and return its rows in engine order
   pub async fn execute(self) -> Result<Vec<Row>, Error> {
      debug!("SQL: {}", self.sql);

      let native = placeholder::to_native(&self.sql);
      let mut conn = self.pool.acquire().await?;

      let mut q = sqlx::query(&native);
      for value in self.args {
         q = bind_value(q, value);
      }

      let mut rows = Vec::new();
      if self.limit != Some(0) {
         let mut stream = q.fetch(&mut *conn);
         while let Some(row) = stream.try_next().await? {
            rows.push(decode_row(&row)?);
            if self.limit.is_some_and(|limit| rows.len() >= limit) {
               break;
            }
         }
      }

      info!("rows returned: {}", rows.len());
      Ok(rows)
   }
}

impl IntoFuture for SelectBuilder {
   type Output = Result<Vec<Row>, Error>;
   type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

   fn into_future(self) -> Self::IntoFuture {
      Box::pin(self.execute())
   }
}

/// Builder for mutating statements (INSERT/UPDATE/DELETE)
pub struct ExecuteBuilder {
   pool: Arc<ConnectionPool>,
   sql: String,
   args: Vec<JsonValue>,
   autocommit: bool,
}

impl ExecuteBuilder {
   pub(crate) fn new(pool: Arc<ConnectionPool>, sql: String, args: Vec<JsonValue>) -> Self {
      let autocommit = pool.autocommit_default();
      Self {
         pool,
         sql,
         args,
         autocommit,
      }
   }

   /// Override the pool's autocommit default for this statement
   ///
   /// With `false` the statement runs inside its own transaction: committed
   /// on success, rolled back before the error is returned on failure.
   pub fn autocommit(mut self, autocommit: bool) -> Self {
      self.autocommit = autocommit;
      self
   }

   /// Run the statement and return the number of affected rows
   pub async fn execute(self) -> Result<u64, Error> {
      debug!("SQL: {}", self.sql);

      let native = placeholder::to_native(&self.sql);
      let mut conn = self.pool.acquire().await?;

      let mut q = sqlx::query(&native);
      for value in self.args {
         q = bind_value(q, value);
      }

      if self.autocommit {
         let result = q.execute(&mut *conn).await?;
         return Ok(result.rows_affected());
      }

      // Dropping an uncommitted transaction (e.g. a cancelled future) rolls it back
      let mut tx = conn.begin().await?;
      match q.execute(&mut *tx).await {
         Ok(result) => {
            tx.commit().await?;
            Ok(result.rows_affected())
         }
         Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
               error!("rollback failed after statement error: {}", rollback_err);
               return Err(Error::RollbackFailed {
                  statement_error: e.to_string(),
                  rollback_error: rollback_err.to_string(),
               });
            }
            Err(Error::Execution(e))
         }
      }
   }
}

impl IntoFuture for ExecuteBuilder {
   type Output = Result<u64, Error>;
   type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

   fn into_future(self) -> Self::IntoFuture {
      Box::pin(self.execute())
   }
}

/// Bind a JSON value to a SQLx query
pub fn bind_value<'a>(
   query: sqlx::query::Query<'a, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'a>>,
   value: JsonValue,
) -> sqlx::query::Query<'a, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'a>> {
   match value {
      JsonValue::Null => query.bind(None::<JsonValue>),
      JsonValue::Bool(b) => query.bind(b),
      JsonValue::String(s) => query.bind(s),
      JsonValue::Number(number) => {
         // Preserve integer precision by binding as i64 when possible
         if let Some(int_val) = number.as_i64() {
            query.bind(int_val)
         } else if let Some(uint_val) = number.as_u64() {
            // Value too large for i64, use f64 (will lose precision)
            query.bind(uint_val as f64)
         } else {
            query.bind(number.as_f64().unwrap_or_default())
         }
      }
      // Arrays and objects are stored as JSON text
      other => query.bind(other),
   }
}
