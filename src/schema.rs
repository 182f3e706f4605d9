//! Compile field descriptors into a table layout and statement templates

use indexmap::IndexMap;
use tracing::info;

use crate::field::Field;
use crate::placeholder::markers;
use crate::{Error, Result};

/// Table layout and SQL templates for one record type.
///
/// Built once by [`Schema::compile`] and shared, immutable, by every record of
/// that type. Templates use the generic `?` marker.
#[derive(Debug)]
pub struct Schema {
   type_name: String,
   table: String,
   primary_key: String,
   fields: Vec<String>,
   mappings: IndexMap<String, Field>,
   select_sql: String,
   insert_sql: String,
   update_sql: String,
   delete_sql: String,
}

impl Schema {
   /// Partition `fields` into the primary key and the rest, then render the
   /// four statement templates.
   ///
   /// `table` defaults to `type_name`. Fails with [`Error::Schema`] when there
   /// is no primary key, more than one, or a field name repeats.
   pub fn compile(type_name: &str, table: Option<&str>, fields: Vec<Field>) -> Result<Self> {
      let table = table.unwrap_or(type_name).to_string();
      info!("found model: {} (table: {})", type_name, table);

      let mut mappings = IndexMap::with_capacity(fields.len());
      let mut primary_key: Option<String> = None;
      let mut non_key = Vec::new();

      for field in fields {
         let name = field.name().to_string();
         if mappings.contains_key(&name) {
            return Err(Error::Schema(format!(
               "duplicate field '{}' in {}",
               name, type_name
            )));
         }
         info!("  found mapping: {} ==> {}", name, field);

         if field.is_primary_key() {
            if let Some(existing) = &primary_key {
               return Err(Error::Schema(format!(
                  "duplicate primary key for field '{}' in {} (already '{}')",
                  name, type_name, existing
               )));
            }
            primary_key = Some(name.clone());
         } else {
            non_key.push(name.clone());
         }
         mappings.insert(name, field);
      }

      let Some(primary_key) = primary_key else {
         return Err(Error::Schema(format!(
            "primary key not found for {}",
            type_name
         )));
      };

      let quoted_table = quote_identifier(&table);
      let quoted_pk = quote_identifier(&primary_key);
      let quoted_fields: Vec<String> = non_key.iter().map(|f| quote_identifier(f)).collect();

      let select_columns = std::iter::once(quoted_pk.clone())
         .chain(quoted_fields.iter().cloned())
         .collect::<Vec<_>>()
         .join(", ");
      let select_sql = format!("select {} from {}", select_columns, quoted_table);

      let insert_columns = quoted_fields
         .iter()
         .cloned()
         .chain(std::iter::once(quoted_pk.clone()))
         .collect::<Vec<_>>()
         .join(", ");
      let insert_sql = format!(
         "insert into {} ({}) values ({})",
         quoted_table,
         insert_columns,
         markers(quoted_fields.len() + 1)
      );

      // A key-only type still gets a valid statement taking just the key
      let assignments = if quoted_fields.is_empty() {
         format!("{}={}", quoted_pk, quoted_pk)
      } else {
         quoted_fields
            .iter()
            .map(|f| format!("{}=?", f))
            .collect::<Vec<_>>()
            .join(", ")
      };
      let update_sql = format!(
         "update {} set {} where {}=?",
         quoted_table, assignments, quoted_pk
      );

      let delete_sql = format!("delete from {} where {}=?", quoted_table, quoted_pk);

      Ok(Self {
         type_name: type_name.to_string(),
         table,
         primary_key,
         fields: non_key,
         mappings,
         select_sql,
         insert_sql,
         update_sql,
         delete_sql,
      })
   }

   pub fn type_name(&self) -> &str {
      &self.type_name
   }

   pub fn table(&self) -> &str {
      &self.table
   }

   pub fn primary_key(&self) -> &str {
      &self.primary_key
   }

   /// Non-key field names in declaration order.
   pub fn fields(&self) -> &[String] {
      &self.fields
   }

   pub fn field(&self, name: &str) -> Option<&Field> {
      self.mappings.get(name)
   }

   pub fn select_sql(&self) -> &str {
      &self.select_sql
   }

   pub fn insert_sql(&self) -> &str {
      &self.insert_sql
   }

   pub fn update_sql(&self) -> &str {
      &self.update_sql
   }

   pub fn delete_sql(&self) -> &str {
      &self.delete_sql
   }

   /// `create table if not exists` statement for this layout.
   ///
   /// Meant for bootstrapping and fixtures; there is no migration support.
   pub fn create_table_sql(&self) -> String {
      let columns = self
         .mappings
         .values()
         .map(|field| {
            let mut column = format!(
               "{} {}",
               quote_identifier(field.name()),
               field.column_type().ddl()
            );
            if field.is_primary_key() {
               column.push_str(" primary key");
            }
            column
         })
         .collect::<Vec<_>>()
         .join(", ");

      format!(
         "create table if not exists {} ({})",
         quote_identifier(&self.table),
         columns
      )
   }
}

/// Quote an identifier with double quotes, doubling any embedded quote.
pub fn quote_identifier(name: &str) -> String {
   format!("\"{}\"", name.replace('"', "\"\""))
}
