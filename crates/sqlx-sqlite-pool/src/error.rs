//! Error types for sqlx-sqlite-pool

use thiserror::Error;

/// Errors that may occur when creating or using a [`ConnectionPool`](crate::ConnectionPool)
#[derive(Error, Debug)]
pub enum Error {
   /// The pool configuration is missing a required parameter or is inconsistent
   #[error("invalid pool configuration: {0}")]
   Configuration(String),

   /// Error from the sqlx library, including acquire timeouts
   #[error("Sqlx error: {0}")]
   Sqlx(#[from] sqlx::Error),

   /// Pool has been closed and cannot hand out connections
   #[error("Connection pool has been closed")]
   PoolClosed,
}

impl Error {
   /// Machine-readable error code
   pub fn error_code(&self) -> &'static str {
      match self {
         Error::Configuration(_) => "CONFIGURATION_ERROR",
         Error::Sqlx(sqlx::Error::PoolTimedOut) => "POOL_TIMED_OUT",
         Error::Sqlx(_) => "SQLX_ERROR",
         Error::PoolClosed => "POOL_CLOSED",
      }
   }
}
