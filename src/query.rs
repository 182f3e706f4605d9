//! Options for `Model::find_all`

use serde_json::Value as JsonValue;

use crate::Error;
use crate::schema::Schema;

/// Row bound appended as `limit ?` or `limit ?, ?`.
///
/// SQLite binds integers as i64, so values above `i64::MAX` are rejected
/// with [`Error::Validation`] before any SQL is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
   /// At most this many rows.
   Count(u64),
   /// Skip `offset` rows, then return at most `count`.
   Range { offset: u64, count: u64 },
}

impl From<u64> for Limit {
   fn from(count: u64) -> Self {
      Limit::Count(count)
   }
}

impl From<(u64, u64)> for Limit {
   fn from((offset, count): (u64, u64)) -> Self {
      Limit::Range { offset, count }
   }
}

impl Limit {
   /// Fail with [`Error::Validation`] when a bound does not fit SQLite's integer range.
   pub fn validate(&self) -> Result<(), Error> {
      let (offset, count) = match *self {
         Limit::Count(count) => (0, count),
         Limit::Range { offset, count } => (offset, count),
      };
      if offset > i64::MAX as u64 || count > i64::MAX as u64 {
         return Err(Error::Validation(format!(
            "limit bound exceeds {}: {:?}",
            i64::MAX,
            self
         )));
      }
      Ok(())
   }
}

impl TryFrom<JsonValue> for Limit {
   type Error = Error;

   /// Accepts a non-negative integer or a two-element `[offset, count]` array.
   fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
      match &value {
         JsonValue::Number(n) => n.as_u64().map(Limit::Count),
         JsonValue::Array(pair) if pair.len() == 2 => pair[0]
            .as_u64()
            .zip(pair[1].as_u64())
            .map(|(offset, count)| Limit::Range { offset, count }),
         _ => None,
      }
      .ok_or_else(|| Error::Validation(format!("invalid limit value: {}", value)))
      .and_then(|limit| limit.validate().map(|()| limit))
   }
}

/// Filter, ordering and bound for a `find_all` query.
///
/// Clauses are raw SQL fragments using the generic `?` marker; they are
/// appended in the fixed order `where`, `order by`, `limit`.
///
/// ```
/// use sqlx_sqlite_orm::{FindAll, Limit};
/// use serde_json::json;
///
/// let query = FindAll::new()
///     .filter("balance > ?", vec![json!(100)])
///     .order_by("id desc")
///     .limit(2u64);
/// assert_eq!(query.limit_value(), Some(Limit::Count(2)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FindAll {
   filter: Option<String>,
   args: Vec<JsonValue>,
   order_by: Option<String>,
   limit: Option<Limit>,
}

impl FindAll {
   pub fn new() -> Self {
      Self::default()
   }

   /// `where` clause and the arguments for its markers.
   pub fn filter(mut self, clause: impl Into<String>, args: Vec<JsonValue>) -> Self {
      self.filter = Some(clause.into());
      self.args = args;
      self
   }

   pub fn order_by(mut self, clause: impl Into<String>) -> Self {
      self.order_by = Some(clause.into());
      self
   }

   pub fn limit(mut self, limit: impl Into<Limit>) -> Self {
      self.limit = Some(limit.into());
      self
   }

   pub fn limit_value(&self) -> Option<Limit> {
      self.limit
   }

   /// Render the statement and its arguments against `schema`'s SELECT template.
   ///
   /// Fails with [`Error::Validation`] when the limit is out of range.
   pub fn to_sql(&self, schema: &Schema) -> Result<(String, Vec<JsonValue>), Error> {
      if let Some(limit) = &self.limit {
         limit.validate()?;
      }

      let mut sql = vec![schema.select_sql().to_string()];
      let mut args = self.args.clone();

      if let Some(filter) = &self.filter {
         sql.push("where".into());
         sql.push(filter.clone());
      }
      if let Some(order_by) = &self.order_by {
         sql.push("order by".into());
         sql.push(order_by.clone());
      }
      match self.limit {
         Some(Limit::Count(count)) => {
            sql.push("limit ?".into());
            args.push(JsonValue::from(count));
         }
         Some(Limit::Range { offset, count }) => {
            sql.push("limit ?, ?".into());
            args.push(JsonValue::from(offset));
            args.push(JsonValue::from(count));
         }
         None => {}
      }

      Ok((sql.join(" "), args))
   }
}
