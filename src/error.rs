use serde::{Serialize, Serializer};

/// Result type alias for router operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Structured error response for the query layer.
#[derive(Serialize)]
struct ErrorResponse {
   code: String,
   message: String,
}

/// Error types for the primary/replica router.
#[derive(Debug, thiserror::Error)]
pub enum Error {
   /// A connection was requested for a role that has no configuration.
   #[error("invalid configuration: {0}")]
   InvalidConfiguration(String),

   /// Error from building or using a connection.
   #[error(transparent)]
   Connection(#[from] sqlx_replica_conn::Error),
}

impl Error {
   /// Extract a structured error code from the error type.
   ///
   /// Connection errors keep the code of the underlying connection error.
   pub fn error_code(&self) -> String {
      match self {
         Error::InvalidConfiguration(_) => "INVALID_CONFIGURATION".to_string(),
         Error::Connection(e) => e.error_code(),
      }
   }
}

impl Serialize for Error {
   fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
   where
      S: Serializer,
   {
      let response = ErrorResponse {
         code: self.error_code(),
         message: self.to_string(),
      };
      response.serialize(serializer)
   }
}
