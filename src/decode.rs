use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use sqlx::sqlite::{SqliteRow, SqliteValueRef};
use sqlx::{Column, Row as _, TypeInfo, Value, ValueRef};

use crate::Error;

/// One result row: column name to value, in the order the engine returned the columns.
pub type Row = IndexMap<String, JsonValue>;

/// Decode every column of a SQLite row into a [`Row`].
pub fn decode_row(row: &SqliteRow) -> Result<Row, Error> {
   let mut decoded = IndexMap::with_capacity(row.columns().len());
   for (i, column) in row.columns().iter().enumerate() {
      let value = row.try_get_raw(i)?;
      decoded.insert(column.name().to_string(), to_json(value)?);
   }
   Ok(decoded)
}

/// Convert a SQLite value to a JSON value.
///
/// Booleans are stored as INTEGER in SQLite and come back as numbers. BLOB
/// values are returned as base64-encoded strings since JSON has no native
/// binary type.
pub fn to_json(value: SqliteValueRef) -> Result<JsonValue, Error> {
   if value.is_null() {
      return Ok(JsonValue::Null);
   }

   let column_type = value.type_info();

   let result = match column_type.name() {
      "TEXT" | "DATE" | "TIME" | "DATETIME" => value
         .to_owned()
         .try_decode::<String>()
         .map(JsonValue::String)
         .unwrap_or(JsonValue::Null),

      "REAL" => value
         .to_owned()
         .try_decode::<f64>()
         .map(JsonValue::from)
         .unwrap_or(JsonValue::Null),

      "INTEGER" | "NUMERIC" => value
         .to_owned()
         .try_decode::<i64>()
         .map(JsonValue::from)
         .unwrap_or(JsonValue::Null),

      "BLOB" => value
         .to_owned()
         .try_decode::<Vec<u8>>()
         .map(|blob| JsonValue::String(base64_encode(&blob)))
         .unwrap_or(JsonValue::Null),

      "NULL" => JsonValue::Null,

      other => {
         // Unknown declared types fall back to their text form
         if let Ok(text) = value.to_owned().try_decode::<String>() {
            JsonValue::String(text)
         } else {
            return Err(Error::UnsupportedDatatype(format!(
               "Unknown SQLite type: {}",
               other
            )));
         }
      }
   };

   Ok(result)
}

fn base64_encode(data: &[u8]) -> String {
   use base64::Engine;
   base64::engine::general_purpose::STANDARD.encode(data)
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_base64_encode() {
      assert_eq!(base64_encode(b"hello"), "aGVsbG8=");
      assert_eq!(base64_encode(&[0, 0, 0]), "AAAA");
      assert_eq!(base64_encode(&[]), "");
   }
}
