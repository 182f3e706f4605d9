//! Key-value instances bound to a compiled schema

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::database::Database;
use crate::decode::Row;
use crate::schema::Schema;
use crate::{Error, Result};

/// One mapped row held in memory.
///
/// Keys are field names; values are whatever the row or the caller put
/// there. A record has no identity beyond its primary-key value, and nothing
/// is cached across records.
#[derive(Debug, Clone)]
pub struct Record {
   schema: Arc<Schema>,
   values: IndexMap<String, JsonValue>,
}

impl Record {
   pub(crate) fn new(schema: Arc<Schema>) -> Self {
      Self {
         schema,
         values: IndexMap::new(),
      }
   }

   pub(crate) fn from_row(schema: Arc<Schema>, row: Row) -> Self {
      Self {
         schema,
         values: row,
      }
   }

   pub fn schema(&self) -> &Schema {
      &self.schema
   }

   /// Raw read. Fails with [`Error::AttributeNotFound`] when `key` was never set;
   /// defaults are not consulted.
   pub fn get(&self, key: &str) -> Result<&JsonValue> {
      self
         .values
         .get(key)
         .ok_or_else(|| Error::AttributeNotFound(key.to_string()))
   }

   pub fn set(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) {
      self.values.insert(key.into(), value.into());
   }

   /// [`set`](Self::set), by value.
   pub fn with(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
      self.set(key, value);
      self
   }

   pub fn contains(&self, key: &str) -> bool {
      self.values.contains_key(key)
   }

   /// The current value, or `null` when `key` was never set.
   pub fn get_value(&self, key: &str) -> JsonValue {
      self.values.get(key).cloned().unwrap_or(JsonValue::Null)
   }

   /// The current value, falling back to the field's declared default.
   ///
   /// A resolved default is written back into the record, so a provider is
   /// called at most once and later reads see the same value. Returns `null`
   /// when there is neither a value nor a default. Fails with
   /// [`Error::AttributeNotFound`] when `key` is not a field of the schema.
   pub fn get_value_or_default(&mut self, key: &str) -> Result<JsonValue> {
      if let Some(value) = self.values.get(key).filter(|v| !v.is_null()) {
         return Ok(value.clone());
      }

      let field = self
         .schema
         .field(key)
         .ok_or_else(|| Error::AttributeNotFound(key.to_string()))?;

      match field.default().resolve() {
         Some(value) => {
            debug!("using default value for {}: {}", key, value);
            self.values.insert(key.to_string(), value.clone());
            Ok(value)
         }
         None => Ok(JsonValue::Null),
      }
   }

   pub fn values(&self) -> &IndexMap<String, JsonValue> {
      &self.values
   }

   pub fn into_values(self) -> IndexMap<String, JsonValue> {
      self.values
   }

   /// INSERT this record, filling unset fields from their defaults.
   ///
   /// Saving the same primary key twice is left to the table's uniqueness
   /// constraint.
   pub async fn save(&mut self, db: &Database) -> Result<()> {
      let schema = Arc::clone(&self.schema);
      let mut args = Vec::with_capacity(schema.fields().len() + 1);
      for field in schema.fields() {
         args.push(self.get_value_or_default(field)?);
      }
      args.push(self.get_value_or_default(schema.primary_key())?);

      let rows = db.execute(schema.insert_sql(), args).await?;
      if rows != 1 {
         warn!("failed to insert record: affected rows: {}", rows);
      }
      Ok(())
   }

   /// UPDATE the row with this record's primary key. Unset fields are written as `null`.
   pub async fn update(&self, db: &Database) -> Result<()> {
      let mut args: Vec<JsonValue> = self
         .schema
         .fields()
         .iter()
         .map(|field| self.get_value(field))
         .collect();
      args.push(self.get_value(self.schema.primary_key()));

      let rows = db.execute(self.schema.update_sql(), args).await?;
      if rows != 1 {
         warn!("failed to update by primary key: affected rows: {}", rows);
      }
      Ok(())
   }

   /// DELETE the row with this record's primary key.
   pub async fn remove(&self, db: &Database) -> Result<()> {
      let args = vec![self.get_value(self.schema.primary_key())];

      let rows = db.execute(self.schema.delete_sql(), args).await?;
      if rows != 1 {
         warn!("failed to remove by primary key: affected rows: {}", rows);
      }
      Ok(())
   }
}

impl Serialize for Record {
   fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
   where
      S: Serializer,
   {
      self.values.serialize(serializer)
   }
}
