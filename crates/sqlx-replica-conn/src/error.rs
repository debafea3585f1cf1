//! Error types for sqlx-replica-conn

use thiserror::Error;

/// Errors that may occur when building or using a [`Connection`](crate::Connection)
#[derive(Error, Debug)]
pub enum Error {
   /// The adapter could not open the underlying handle
   #[error("failed to connect to '{dsn}': {source}")]
   ConnectionFailure {
      dsn: String,
      #[source]
      source: Box<dyn std::error::Error + Send + Sync>,
   },

   /// A configured attribute cannot be applied by the backend
   #[error("invalid attribute '{key}': {reason}")]
   InvalidAttribute { key: String, reason: String },

   /// `begin_transaction` called while a transaction is already open
   #[error("transaction already active on connection {0}")]
   TransactionAlreadyActive(String),

   /// `commit` or `rollback` called with no open transaction
   #[error("no active transaction on connection {0}")]
   NoActiveTransaction(String),

   /// Error from the sqlx library while running a statement on an open handle
   #[error("Sqlx error: {0}")]
   Sqlx(#[from] sqlx::Error),
}

impl Error {
   /// Wrap a backend error raised while opening the handle for `dsn`
   pub fn connection_failure(
      dsn: impl Into<String>,
      source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
   ) -> Self {
      Error::ConnectionFailure {
         dsn: dsn.into(),
         source: source.into(),
      }
   }

   /// True for misuse of the begin/commit/rollback lifecycle
   pub fn is_transaction_state(&self) -> bool {
      matches!(
         self,
         Error::TransactionAlreadyActive(_) | Error::NoActiveTransaction(_)
      )
   }

   /// Extract a structured error code from the error type.
   pub fn error_code(&self) -> String {
      match self {
         Error::ConnectionFailure { .. } => "CONNECTION_FAILURE".to_string(),
         Error::InvalidAttribute { .. } => "INVALID_ATTRIBUTE".to_string(),
         Error::TransactionAlreadyActive(_) => "TRANSACTION_ALREADY_ACTIVE".to_string(),
         Error::NoActiveTransaction(_) => "NO_ACTIVE_TRANSACTION".to_string(),
         Error::Sqlx(e) => {
            if let Some(code) = e.as_database_error().and_then(|db_err| db_err.code()) {
               return format!("SQLITE_{}", code);
            }
            "SQLX_ERROR".to_string()
         }
      }
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn test_error_code_connection_failure() {
      let err = Error::connection_failure(
         "sqlite://missing.db",
         std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
      );
      assert_eq!(err.error_code(), "CONNECTION_FAILURE");
      assert!(err.to_string().contains("sqlite://missing.db"));
      assert!(err.to_string().contains("missing"));
      assert!(std::error::Error::source(&err).is_some());
   }

   #[test]
   fn test_error_code_invalid_attribute() {
      let err = Error::InvalidAttribute {
         key: "user_version".into(),
         reason: "arrays are not supported".into(),
      };
      assert_eq!(err.error_code(), "INVALID_ATTRIBUTE");
      assert!(err.to_string().contains("user_version"));
   }

   #[test]
   fn test_transaction_state_kind() {
      assert!(Error::TransactionAlreadyActive("foo".into()).is_transaction_state());
      assert!(Error::NoActiveTransaction("foo".into()).is_transaction_state());
      assert!(!Error::Sqlx(sqlx::Error::RowNotFound).is_transaction_state());

      assert_eq!(
         Error::TransactionAlreadyActive("foo".into()).error_code(),
         "TRANSACTION_ALREADY_ACTIVE"
      );
      assert_eq!(
         Error::NoActiveTransaction("foo".into()).error_code(),
         "NO_ACTIVE_TRANSACTION"
      );
   }

   #[test]
   fn test_error_code_sqlx_non_database() {
      // RowNotFound is not a database error, so no SQLite code
      let err = Error::Sqlx(sqlx::Error::RowNotFound);
      assert_eq!(err.error_code(), "SQLX_ERROR");
   }
}
