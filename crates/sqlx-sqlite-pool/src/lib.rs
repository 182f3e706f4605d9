//! # sqlx-sqlite-pool
//!
//! An owned, bounded pool of SQLite connections built on SQLx.
//!
//! ## Core Types
//!
//! - **[`ConnectionPool`]**: The pool itself, created once and shared by `Arc`
//! - **[`PoolConfig`]**: Path and pool sizing
//! - **[`PooledConnection`]**: RAII guard returning its connection on drop
//! - **[`Error`]**: Error type for pool operations
//!
//! ## Usage
//!
//! ```no_run
//! use sqlx_sqlite_pool::{ConnectionPool, PoolConfig};
//!
//! #[tokio::main]
//! async fn main() -> sqlx_sqlite_pool::Result<()> {
//!     let pool = ConnectionPool::initialize(PoolConfig::new("example.db")).await?;
//!
//!     {
//!         let mut conn = pool.acquire().await?;
//!         sqlx::query("CREATE TABLE IF NOT EXISTS users (id INTEGER PRIMARY KEY)")
//!             .execute(&mut *conn)
//!             .await?;
//!     } // connection returned here
//!
//!     pool.close().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Design Principles
//!
//! - No global state: the pool is an explicit value owned by the application
//! - Uses sqlx's `SqlitePoolOptions` for sizing and timeouts
//! - A connection is only ever reachable through a guard, so it is returned on
//!   every exit path
//!
mod config;
mod error;
mod guard;
mod pool;

pub use config::{MAX_ACQUIRE_TIMEOUT_SECS, PoolConfig};
pub use error::Error;
pub use guard::PooledConnection;
pub use pool::ConnectionPool;

/// A type alias for Results with our custom Error type
pub type Result<T> = std::result::Result<T, Error>;
