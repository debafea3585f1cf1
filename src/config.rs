//! Configuration for a primary/replica router

use serde::{Deserialize, Serialize};
use sqlx_replica_conn::ConnectionConfig;

/// Everything a [`PrimaryReplicaManager`](crate::PrimaryReplicaManager) needs,
/// in the shape an external configuration loader hands over.
///
/// # Examples
///
/// ```
/// use sqlx_replica_router::ReplicaSetConfig;
/// use sqlx_replica_conn::ConnectionConfig;
///
/// let config = ReplicaSetConfig {
///     name: Some("bookstore".into()),
///     write: Some(ConnectionConfig::new("sqlite://primary.db?mode=rwc")),
///     read: vec![
///         ConnectionConfig::new("sqlite://replica-1.db?mode=ro"),
///         ConnectionConfig::new("sqlite://replica-2.db?mode=ro"),
///     ],
///     ..Default::default()
/// };
/// assert!(!config.force_primary);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplicaSetConfig {
   /// Name propagated to every connection the manager builds
   ///
   /// Default: none
   #[serde(default)]
   pub name: Option<String>,

   /// Primary connection
   ///
   /// Default: none (write connections fail with `InvalidConfiguration`)
   #[serde(default)]
   pub write: Option<ConnectionConfig>,

   /// Replica connections; when empty, reads go to the primary
   ///
   /// Default: empty
   #[serde(default)]
   pub read: Vec<ConnectionConfig>,

   /// Route every read to the primary
   ///
   /// Default: false
   #[serde(default)]
   pub force_primary: bool,
}
