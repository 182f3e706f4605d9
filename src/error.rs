/// Result type alias for ORM operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the executor, the schema compiler and mapped records.
#[derive(Debug, thiserror::Error)]
pub enum Error {
   /// A statement failed in the engine. Non-autocommit statements have
   /// already been rolled back when this is returned.
   #[error("statement execution failed: {0}")]
   Execution(#[from] sqlx::Error),

   /// Error from the connection pool (configuration, timeout, closed pool).
   #[error(transparent)]
   Pool(#[from] sqlx_sqlite_pool::Error),

   /// A record type declared zero or several primary keys, or reused a field name.
   #[error("schema error: {0}")]
   Schema(String),

   /// An argument had a shape the operation cannot turn into SQL.
   #[error("validation error: {0}")]
   Validation(String),

   /// Raw read of a key the record does not hold.
   #[error("record has no attribute '{0}'")]
   AttributeNotFound(String),

   /// SQLite value that cannot be mapped to JSON.
   #[error("unsupported datatype: {0}")]
   UnsupportedDatatype(String),

   /// Statement failed and the rollback that followed also failed.
   #[error("statement failed: {statement_error}; rollback also failed: {rollback_error}")]
   RollbackFailed {
      statement_error: String,
      rollback_error: String,
   },
}

impl Error {
   /// Extract a structured error code from the error type.
   pub fn error_code(&self) -> String {
      match self {
         Error::Execution(e) => {
            if let Some(code) = e.as_database_error().and_then(|db_err| db_err.code()) {
               return format!("SQLITE_{}", code);
            }
            "EXECUTION_ERROR".to_string()
         }
         Error::Pool(e) => e.error_code().to_string(),
         Error::Schema(_) => "SCHEMA_ERROR".to_string(),
         Error::Validation(_) => "VALIDATION_ERROR".to_string(),
         Error::AttributeNotFound(_) => "ATTRIBUTE_NOT_FOUND".to_string(),
         Error::UnsupportedDatatype(_) => "UNSUPPORTED_DATATYPE".to_string(),
         Error::RollbackFailed { .. } => "ROLLBACK_FAILED".to_string(),
      }
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_error_code_schema() {
      let err = Error::Schema("primary key not found for User".into());
      assert_eq!(err.error_code(), "SCHEMA_ERROR");
      assert!(err.to_string().contains("User"));
   }

   #[test]
   fn test_error_code_attribute_not_found() {
      let err = Error::AttributeNotFound("email".into());
      assert_eq!(err.error_code(), "ATTRIBUTE_NOT_FOUND");
      assert_eq!(err.to_string(), "record has no attribute 'email'");
   }

   #[test]
   fn test_error_code_configuration_passes_through() {
      let err = Error::Pool(sqlx_sqlite_pool::Error::Configuration(
         "database path is required".into(),
      ));
      assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
   }

   #[test]
   fn test_error_code_rollback_failed() {
      let err = Error::RollbackFailed {
         statement_error: "constraint".into(),
         rollback_error: "busy".into(),
      };
      assert_eq!(err.error_code(), "ROLLBACK_FAILED");
      assert!(err.to_string().contains("constraint"));
      assert!(err.to_string().contains("busy"));
   }

   #[test]
   fn test_error_code_execution_non_database() {
      let err = Error::Execution(sqlx::Error::RowNotFound);
      assert_eq!(err.error_code(), "EXECUTION_ERROR");
   }
}
