//! Declarative descriptions of mapped columns

use std::fmt;
use std::sync::Arc;

use serde_json::Value as JsonValue;

/// Storage type of a mapped column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
   /// `varchar(n)`
   Varchar(u32),
   Boolean,
   BigInt,
   Real,
   Text,
}

impl ColumnType {
   /// Column type as it appears in DDL.
   pub fn ddl(&self) -> String {
      match self {
         ColumnType::Varchar(len) => format!("varchar({})", len),
         ColumnType::Boolean => "boolean".to_string(),
         ColumnType::BigInt => "bigint".to_string(),
         ColumnType::Real => "real".to_string(),
         ColumnType::Text => "text".to_string(),
      }
   }
}

/// Value used by `save()` when a record holds nothing for a field.
#[derive(Clone, Default)]
pub enum FieldDefault {
   #[default]
   None,
   /// A fixed value.
   Value(JsonValue),
   /// Called each time a default is needed, e.g. to mint ids or timestamps.
   Provider(Arc<dyn Fn() -> JsonValue + Send + Sync>),
}

impl FieldDefault {
   /// Produce the default, calling the provider if there is one.
   pub fn resolve(&self) -> Option<JsonValue> {
      match self {
         FieldDefault::None => None,
         FieldDefault::Value(value) => Some(value.clone()),
         FieldDefault::Provider(provider) => Some(provider()),
      }
   }

   pub fn is_none(&self) -> bool {
      matches!(self, FieldDefault::None)
   }
}

impl fmt::Debug for FieldDefault {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      match self {
         FieldDefault::None => f.write_str("None"),
         FieldDefault::Value(value) => f.debug_tuple("Value").field(value).finish(),
         FieldDefault::Provider(_) => f.write_str("Provider(..)"),
      }
   }
}

/// Metadata for one mapped attribute: name, column type, key flag and default.
///
/// Built with one of the typed constructors and refined with the modifiers:
///
/// ```
/// use sqlx_sqlite_orm::Field;
/// use serde_json::json;
///
/// let id = Field::string("id").varchar(50).primary_key();
/// let name = Field::string("name").default_value("anon");
/// let admin = Field::boolean("admin");
///
/// assert!(id.is_primary_key());
/// assert_eq!(admin.default().resolve(), Some(json!(false)));
/// assert_eq!(name.default().resolve(), Some(json!("anon")));
/// ```
#[derive(Debug, Clone)]
pub struct Field {
   name: String,
   column_type: ColumnType,
   primary_key: bool,
   default: FieldDefault,
}

impl Field {
   pub fn new(
      name: impl Into<String>,
      column_type: ColumnType,
      primary_key: bool,
      default: FieldDefault,
   ) -> Self {
      Self {
         name: name.into(),
         column_type,
         primary_key,
         default,
      }
   }

   /// `varchar(100)` with no default.
   pub fn string(name: impl Into<String>) -> Self {
      Self::new(name, ColumnType::Varchar(100), false, FieldDefault::None)
   }

   /// `boolean` defaulting to `false`.
   pub fn boolean(name: impl Into<String>) -> Self {
      Self::new(
         name,
         ColumnType::Boolean,
         false,
         FieldDefault::Value(JsonValue::Bool(false)),
      )
   }

   /// `bigint` defaulting to `0`.
   pub fn integer(name: impl Into<String>) -> Self {
      Self::new(
         name,
         ColumnType::BigInt,
         false,
         FieldDefault::Value(JsonValue::from(0)),
      )
   }

   /// `real` defaulting to `0.0`.
   pub fn float(name: impl Into<String>) -> Self {
      Self::new(
         name,
         ColumnType::Real,
         false,
         FieldDefault::Value(JsonValue::from(0.0)),
      )
   }

   /// `text` with no default.
   pub fn text(name: impl Into<String>) -> Self {
      Self::new(name, ColumnType::Text, false, FieldDefault::None)
   }

   /// Mark this field as the record type's primary key.
   pub fn primary_key(mut self) -> Self {
      self.primary_key = true;
      self
   }

   /// Change the length of a `varchar` column. Other column types are unchanged.
   pub fn varchar(mut self, len: u32) -> Self {
      if let ColumnType::Varchar(_) = self.column_type {
         self.column_type = ColumnType::Varchar(len);
      }
      self
   }

   pub fn default_value(mut self, value: impl Into<JsonValue>) -> Self {
      self.default = FieldDefault::Value(value.into());
      self
   }

   /// Use `provider` to produce the default on demand.
   pub fn default_with<F>(mut self, provider: F) -> Self
   where
      F: Fn() -> JsonValue + Send + Sync + 'static,
   {
      self.default = FieldDefault::Provider(Arc::new(provider));
      self
   }

   pub fn no_default(mut self) -> Self {
      self.default = FieldDefault::None;
      self
   }

   pub fn name(&self) -> &str {
      &self.name
   }

   pub fn column_type(&self) -> ColumnType {
      self.column_type
   }

   pub fn is_primary_key(&self) -> bool {
      self.primary_key
   }

   pub fn default(&self) -> &FieldDefault {
      &self.default
   }
}

impl fmt::Display for Field {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      write!(f, "<Field, {}:{}>", self.column_type.ddl(), self.name)
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use serde_json::json;
   use std::sync::atomic::{AtomicUsize, Ordering};

   #[test]
   fn test_constructor_defaults() {
      assert!(Field::string("s").default().is_none());
      assert!(Field::text("t").default().is_none());
      assert_eq!(Field::integer("i").default().resolve(), Some(json!(0)));
      assert_eq!(Field::float("f").default().resolve(), Some(json!(0.0)));
      assert_eq!(Field::boolean("b").default().resolve(), Some(json!(false)));
   }

   #[test]
   fn test_column_ddl() {
      assert_eq!(Field::string("s").column_type().ddl(), "varchar(100)");
      assert_eq!(Field::string("s").varchar(50).column_type().ddl(), "varchar(50)");
      assert_eq!(Field::integer("i").varchar(50).column_type(), ColumnType::BigInt);
      assert_eq!(Field::float("f").column_type().ddl(), "real");
   }

   #[test]
   fn test_provider_called_per_resolve() {
      let calls = Arc::new(AtomicUsize::new(0));
      let counter = Arc::clone(&calls);
      let field = Field::string("id").default_with(move || {
         json!(counter.fetch_add(1, Ordering::SeqCst))
      });

      assert_eq!(field.default().resolve(), Some(json!(0)));
      assert_eq!(field.default().resolve(), Some(json!(1)));
      assert_eq!(calls.load(Ordering::SeqCst), 2);
   }

   #[test]
   fn test_display() {
      assert_eq!(Field::integer("id").to_string(), "<Field, bigint:id>");
   }
}
