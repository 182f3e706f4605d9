//! A small object-relational mapper for SQLite.
//!
//! Record types are declared as a list of [`Field`]s and compiled once into a
//! [`Schema`] holding the SELECT/INSERT/UPDATE/DELETE templates. [`Record`]s
//! are key-value instances of a type; they are read through [`Model`] queries
//! and written back with `save`, `update` and `remove`. Every statement runs
//! through a [`Database`], which checks a connection out of an owned
//! [`ConnectionPool`] for the duration of the call.
//!
//! - [`Database`]: statement executor ([`SelectBuilder`], [`ExecuteBuilder`])
//! - [`Field`] / [`Schema`]: declarative metadata and its compiled form
//! - [`Model`] / [`Record`]: type-level queries and instance-level writes
//!
//! # Example
//!
//! ```no_run
//! use sqlx_sqlite_orm::{Database, Field, FindAll, Model, PoolConfig};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), sqlx_sqlite_orm::Error> {
//! let db = Database::connect(PoolConfig::new("blog.db")).await?;
//!
//! let accounts = Model::builder("Account")
//!    .field(Field::integer("id").primary_key())
//!    .field(Field::string("name").default_value("anon"))
//!    .field(Field::float("balance"))
//!    .build()?;
//! accounts.create_table(&db).await?;
//!
//! let mut account = accounts.record().with("id", 1);
//! account.save(&db).await?;
//!
//! let rich = accounts
//!    .find_all(
//!       &db,
//!       FindAll::new()
//!          .filter("balance > ?", vec![json!(100)])
//!          .order_by("id desc")
//!          .limit(2u64),
//!    )
//!    .await?;
//!
//! db.close().await;
//! # Ok(())
//! # }
//! ```

pub mod builders;
pub mod database;
pub mod decode;
pub mod error;
pub mod field;
pub mod model;
pub mod placeholder;
pub mod query;
pub mod record;
pub mod schema;

pub use builders::{ExecuteBuilder, SelectBuilder, bind_value};
pub use database::Database;
pub use decode::Row;
pub use error::{Error, Result};
pub use field::{ColumnType, Field, FieldDefault};
pub use model::{Model, ModelBuilder};
pub use query::{FindAll, Limit};
pub use record::Record;
pub use schema::Schema;

// Re-export commonly used types from the pool crate
pub use sqlx_sqlite_pool::{ConnectionPool, PoolConfig, PooledConnection};
