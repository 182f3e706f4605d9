//! Record types and their type-level queries

use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::Result;
use crate::database::Database;
use crate::decode::Row;
use crate::field::Field;
use crate::query::FindAll;
use crate::record::Record;
use crate::schema::{Schema, quote_identifier};

/// A registered record type: a compiled [`Schema`] plus the queries that
/// return records of that type.
///
/// Register each type once during start-up and clone the `Model` wherever it
/// is needed; clones share the schema.
///
/// # Example
///
/// ```no_run
/// # async fn example(db: &sqlx_sqlite_orm::Database) -> Result<(), sqlx_sqlite_orm::Error> {
/// use sqlx_sqlite_orm::{Field, FindAll, Model};
/// use serde_json::json;
///
/// let users = Model::builder("User")
///     .table("users")
///     .field(Field::string("id").varchar(50).primary_key())
///     .field(Field::string("email").varchar(50))
///     .field(Field::boolean("admin"))
///     .build()?;
///
/// let mut user = users.record().with("id", "u-1").with("email", "a@b.c");
/// user.save(db).await?;
///
/// let admins = users
///     .find_all(db, FindAll::new().filter("admin = ?", vec![json!(true)]))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Model {
   schema: Arc<Schema>,
}

/// Collects field descriptors for [`Model::builder`].
#[derive(Debug)]
pub struct ModelBuilder {
   type_name: String,
   table: Option<String>,
   fields: Vec<Field>,
}

impl ModelBuilder {
   /// Table name, if it differs from the type name.
   pub fn table(mut self, table: impl Into<String>) -> Self {
      self.table = Some(table.into());
      self
   }

   pub fn field(mut self, field: Field) -> Self {
      self.fields.push(field);
      self
   }

   pub fn fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
      self.fields.extend(fields);
      self
   }

   /// Compile the schema. See [`Schema::compile`] for the failure cases.
   pub fn build(self) -> Result<Model> {
      let schema = Schema::compile(&self.type_name, self.table.as_deref(), self.fields)?;
      Ok(Model {
         schema: Arc::new(schema),
      })
   }
}

impl Model {
   pub fn builder(type_name: impl Into<String>) -> ModelBuilder {
      ModelBuilder {
         type_name: type_name.into(),
         table: None,
         fields: Vec::new(),
      }
   }

   pub fn schema(&self) -> &Schema {
      &self.schema
   }

   /// An empty record of this type.
   pub fn record(&self) -> Record {
      Record::new(Arc::clone(&self.schema))
   }

   /// A record holding exactly the columns of `row`.
   pub fn from_row(&self, row: Row) -> Record {
      Record::from_row(Arc::clone(&self.schema), row)
   }

   /// Records matching `query`, one per returned row.
   pub async fn find_all(&self, db: &Database, query: FindAll) -> Result<Vec<Record>> {
      let (sql, args) = query.to_sql(&self.schema)?;
      let rows = db.select(sql, args).await?;
      Ok(rows.into_iter().map(|row| self.from_row(row)).collect())
   }

   /// Value of a single aggregate expression such as `count(id)`, or `None`
   /// when the query returns no row.
   pub async fn find_number(
      &self,
      db: &Database,
      expr: &str,
      filter: Option<&str>,
      args: Vec<JsonValue>,
   ) -> Result<Option<JsonValue>> {
      let mut sql = format!(
         "select {} as \"__num__\" from {}",
         expr,
         quote_identifier(self.schema.table())
      );
      if let Some(filter) = filter {
         sql.push_str(" where ");
         sql.push_str(filter);
      }

      let rows = db.select(sql, args).limit(1).await?;
      Ok(rows
         .into_iter()
         .next()
         .and_then(|mut row| row.swap_remove("__num__")))
   }

   /// The record whose primary key equals `pk`.
   pub async fn find(&self, db: &Database, pk: impl Into<JsonValue>) -> Result<Option<Record>> {
      let sql = format!(
         "{} where {}=?",
         self.schema.select_sql(),
         quote_identifier(self.schema.primary_key())
      );

      let rows = db.select(sql, vec![pk.into()]).limit(1).await?;
      Ok(rows.into_iter().next().map(|row| self.from_row(row)))
   }

   /// Create the table if it is missing.
   pub async fn create_table(&self, db: &Database) -> Result<()> {
      db.execute(self.schema.create_table_sql(), vec![]).await?;
      Ok(())
   }
}
