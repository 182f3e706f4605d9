//! Configuration for the SQLite connection pool

use crate::Result;
use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Largest accepted `acquire_timeout_secs` (100 years). sqlx adds the timeout
/// to `Instant::now()`, which overflows for larger values.
pub const MAX_ACQUIRE_TIMEOUT_SECS: u64 = 100 * 365 * 24 * 60 * 60;

/// Configuration for [`ConnectionPool`](crate::ConnectionPool)
///
/// Only `database` is required. Everything else has a default.
///
/// # Examples
///
/// ```
/// use sqlx_sqlite_pool::PoolConfig;
///
/// let config = PoolConfig {
///     database: "app.db".into(),
///     max_connections: 4,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
   /// Path to the SQLite database file
   pub database: PathBuf,

   /// Create the database file when it does not exist
   ///
   /// Default: true
   pub create_if_missing: bool,

   /// Whether mutating statements run without an explicit transaction
   /// unless the caller says otherwise
   ///
   /// Default: true
   pub autocommit: bool,

   /// Connections the pool keeps open even when idle
   ///
   /// Default: 1
   pub min_connections: u32,

   /// Upper bound on simultaneously checked-out connections
   ///
   /// Default: 10
   pub max_connections: u32,

   /// How long `acquire()` waits for a free connection before failing
   /// with `PoolTimedOut` (in seconds). `None` waits until a connection is
   /// released, however long that takes.
   ///
   /// At most [`MAX_ACQUIRE_TIMEOUT_SECS`].
   ///
   /// Default: Some(30)
   pub acquire_timeout_secs: Option<u64>,

   /// Idle connections above `min_connections` are closed after this long
   /// (in seconds)
   ///
   /// Default: 30
   pub idle_timeout_secs: u64,
}

impl Default for PoolConfig {
   fn default() -> Self {
      Self {
         database: PathBuf::new(),
         create_if_missing: true,
         autocommit: true,
         min_connections: 1,
         max_connections: 10,
         acquire_timeout_secs: Some(30),
         idle_timeout_secs: 30,
      }
   }
}

impl PoolConfig {
   /// Config for the database at `path` with default pool settings
   pub fn new(path: impl Into<PathBuf>) -> Self {
      Self {
         database: path.into(),
         ..Default::default()
      }
   }

   /// Check that required parameters are present and the bounds are sane
   pub fn validate(&self) -> Result<()> {
      if self.database.as_os_str().is_empty() {
         return Err(Error::Configuration("database path is required".into()));
      }
      if self.max_connections == 0 {
         return Err(Error::Configuration(
            "max_connections must be at least 1".into(),
         ));
      }
      if self.min_connections > self.max_connections {
         return Err(Error::Configuration(format!(
            "min_connections ({}) exceeds max_connections ({})",
            self.min_connections, self.max_connections
         )));
      }
      if let Some(secs) = self.acquire_timeout_secs
         && secs > MAX_ACQUIRE_TIMEOUT_SECS
      {
         return Err(Error::Configuration(format!(
            "acquire_timeout_secs ({}) exceeds {}; use None to wait indefinitely",
            secs, MAX_ACQUIRE_TIMEOUT_SECS
         )));
      }
      Ok(())
   }

   /// Timeout handed to sqlx. `None` maps to the largest accepted bound.
   pub(crate) fn acquire_timeout(&self) -> Duration {
      Duration::from_secs(
         self
            .acquire_timeout_secs
            .unwrap_or(MAX_ACQUIRE_TIMEOUT_SECS),
      )
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_defaults() {
      let config = PoolConfig::default();
      assert!(config.autocommit);
      assert_eq!((config.min_connections, config.max_connections), (1, 10));
      assert_eq!(config.acquire_timeout_secs, Some(30));
      assert_eq!(config.acquire_timeout(), Duration::from_secs(30));
   }

   #[test]
   fn test_missing_database_rejected() {
      let err = PoolConfig::default().validate().unwrap_err();
      assert!(matches!(err, Error::Configuration(_)));
      assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
   }

   #[test]
   fn test_inverted_bounds_rejected() {
      let config = PoolConfig {
         min_connections: 5,
         max_connections: 2,
         ..PoolConfig::new("x.db")
      };
      let err = config.validate().unwrap_err();
      assert!(err.to_string().contains("min_connections (5)"));
   }

   #[test]
   fn test_zero_max_rejected() {
      let config = PoolConfig {
         min_connections: 0,
         max_connections: 0,
         ..PoolConfig::new("x.db")
      };
      assert!(matches!(config.validate(), Err(Error::Configuration(_))));
   }

   #[test]
   fn test_overflowing_timeout_rejected() {
      let config = PoolConfig {
         acquire_timeout_secs: Some(u64::MAX),
         ..PoolConfig::new("x.db")
      };
      let err = config.validate().unwrap_err();
      assert!(matches!(err, Error::Configuration(_)));
      assert!(err.to_string().contains("use None"));
   }

   #[test]
   fn test_unbounded_timeout_accepted() {
      let config = PoolConfig {
         acquire_timeout_secs: None,
         ..PoolConfig::new("x.db")
      };
      assert!(config.validate().is_ok());
      assert_eq!(
         config.acquire_timeout(),
         Duration::from_secs(MAX_ACQUIRE_TIMEOUT_SECS)
      );
   }
}
