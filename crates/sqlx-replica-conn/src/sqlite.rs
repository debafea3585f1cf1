//! SQLite backend built on sqlx

use std::str::FromStr;

use serde_json::Value as JsonValue;
use sqlx::ConnectOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};

use crate::Result;
use crate::adapter::{Adapter, RawConnection};
use crate::config::ConnectionConfig;
use crate::error::Error;

/// Adapter opening single SQLite connections through sqlx
///
/// The DSN is anything `SqliteConnectOptions` parses (`sqlite::memory:`,
/// `sqlite://app.db?mode=ro`, ...). Every attribute is applied as a PRAGMA,
/// in declaration order, when the connection is established:
///
/// - strings are passed verbatim
/// - numbers use their decimal text
/// - booleans become `ON` / `OFF`
///
/// Null, array and object values are rejected before any connection is
/// attempted. Like every other failure to open the handle, this is reported as
/// [`Error::ConnectionFailure`], with the offending attribute as its source
/// ([`Error::InvalidAttribute`]).
///
/// # Example
///
/// ```no_run
/// use sqlx_replica_conn::{Adapter, ConnectionConfig, SqliteAdapter};
///
/// # async fn example() -> Result<(), sqlx_replica_conn::Error> {
/// let config = ConnectionConfig::new("sqlite://replica.db?mode=ro")
///     .with_attribute("query_only", true);
/// let replica = SqliteAdapter.build(&config).await?;
/// let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
///     .fetch_one(&mut *replica.wrapped_connection().await)
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteAdapter;

impl Adapter for SqliteAdapter {
   type Raw = SqliteConnection;

   async fn open(&self, config: &ConnectionConfig) -> Result<SqliteConnection> {
      let mut options = SqliteConnectOptions::from_str(&config.dsn)
         .map_err(|e| Error::connection_failure(&config.dsn, e))?;

      for (key, value) in &config.attributes {
         let value =
            pragma_value(key, value).map_err(|e| Error::connection_failure(&config.dsn, e))?;
         options = options.pragma(key.clone(), value);
      }

      options
         .connect()
         .await
         .map_err(|e| Error::connection_failure(&config.dsn, e))
   }
}

impl RawConnection for SqliteConnection {
   async fn begin(&mut self) -> Result<()> {
      sqlx::query("BEGIN").execute(&mut *self).await?;
      Ok(())
   }

   async fn commit(&mut self) -> Result<()> {
      sqlx::query("COMMIT").execute(&mut *self).await?;
      Ok(())
   }

   async fn rollback(&mut self) -> Result<()> {
      sqlx::query("ROLLBACK").execute(&mut *self).await?;
      Ok(())
   }
}

fn pragma_value(key: &str, value: &JsonValue) -> Result<String> {
   match value {
      JsonValue::String(s) => Ok(s.clone()),
      JsonValue::Number(n) => Ok(n.to_string()),
      JsonValue::Bool(true) => Ok("ON".to_string()),
      JsonValue::Bool(false) => Ok("OFF".to_string()),
      other => Err(Error::InvalidAttribute {
         key: key.to_string(),
         reason: format!("unsupported PRAGMA value {}", other),
      }),
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use serde_json::json;

   #[test]
   fn test_pragma_value_conversions() {
      assert_eq!(pragma_value("journal_mode", &json!("WAL")).unwrap(), "WAL");
      assert_eq!(pragma_value("cache_size", &json!(-2000)).unwrap(), "-2000");
      assert_eq!(pragma_value("foreign_keys", &json!(true)).unwrap(), "ON");
      assert_eq!(pragma_value("query_only", &json!(false)).unwrap(), "OFF");
   }

   #[test]
   fn test_pragma_value_rejects_structured_values() {
      for value in [json!(null), json!([1, 2]), json!({ "a": 1 })] {
         let err = pragma_value("user_version", &value).unwrap_err();
         assert!(
            matches!(err, Error::InvalidAttribute { ref key, .. } if key == "user_version"),
            "Expected InvalidAttribute for {}",
            value
         );
      }
   }
}
