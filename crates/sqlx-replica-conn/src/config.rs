//! Configuration for a single database connection

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Descriptor an [`Adapter`](crate::Adapter) opens a connection from
///
/// Attributes are backend specific and applied in insertion order once the
/// handle is open.
///
/// # Examples
///
/// ```
/// use sqlx_replica_conn::ConnectionConfig;
///
/// let config = ConnectionConfig::new("sqlite://replica.db?mode=ro")
///     .with_attribute("cache_size", -8000)
///     .with_attribute("query_only", true);
///
/// assert_eq!(config.attributes.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionConfig {
   /// Backend connection string, e.g. `sqlite::memory:` or `sqlite://app.db?mode=rwc`
   pub dsn: String,

   /// Attributes applied to the handle after it is opened
   ///
   /// Default: empty
   #[serde(default)]
   pub attributes: IndexMap<String, JsonValue>,
}

impl ConnectionConfig {
   pub fn new(dsn: impl Into<String>) -> Self {
      Self {
         dsn: dsn.into(),
         attributes: IndexMap::new(),
      }
   }

   /// Add or replace an attribute, keeping its original position when replaced
   pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
      self.attributes.insert(key.into(), value.into());
      self
   }
}
