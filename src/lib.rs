//! Primary/replica connection routing on top of [`sqlx_replica_conn`].
//!
//! A logical datastore is split across one writable primary and zero or more
//! read-only replicas. The managers in this crate lazily build and cache one
//! connection per role and decide, per call, whether a read may be served by a
//! replica or must go to the primary:
//!
//! - [`PrimaryReplicaManager`]: primary plus replicas, transaction-aware read routing
//! - [`SingleConnectionManager`]: one connection serving both roles
//! - [`ConnectionManager`]: the interface both implement
//! - [`ReplicaSelector`] / [`RandomReplicaSelector`]: replica choice on first read
//!
//! # Example
//!
//! ```no_run
//! use sqlx_replica_conn::{ConnectionConfig, SqliteAdapter};
//! use sqlx_replica_router::{ReplicaSetConfig, SqlitePrimaryReplicaManager};
//!
//! # async fn example() -> Result<(), sqlx_replica_router::Error> {
//! let manager = SqlitePrimaryReplicaManager::from_config(ReplicaSetConfig {
//!     write: Some(ConnectionConfig::new("sqlite://app.db?mode=rwc")),
//!     read: vec![ConnectionConfig::new("sqlite://app.db?mode=ro")],
//!     ..Default::default()
//! });
//!
//! let writer = manager.get_write_connection(&SqliteAdapter).await?;
//! sqlx::query("CREATE TABLE IF NOT EXISTS users (name TEXT)")
//!     .execute(&mut *writer.wrapped_connection().await)
//!     .await
//!     .map_err(sqlx_replica_conn::Error::from)?;
//!
//! let reader = manager.get_read_connection(&SqliteAdapter).await?;
//! let rows = sqlx::query("SELECT name FROM users")
//!     .fetch_all(&mut *reader.wrapped_connection().await)
//!     .await
//!     .map_err(sqlx_replica_conn::Error::from)?;
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod manager;
mod primary_replica;
mod selector;
mod single;

#[cfg(test)]
mod test_support;

pub use config::ReplicaSetConfig;
pub use error::{Error, Result};
pub use manager::ConnectionManager;
pub use primary_replica::PrimaryReplicaManager;
pub use selector::{RandomReplicaSelector, ReplicaSelector};
pub use single::SingleConnectionManager;

use sqlx_replica_conn::SqliteConnection;

/// Primary/replica manager over SQLite connections opened by `SqliteAdapter`
pub type SqlitePrimaryReplicaManager = PrimaryReplicaManager<SqliteConnection>;

/// Single-connection manager over SQLite connections opened by `SqliteAdapter`
pub type SqliteSingleConnectionManager = SingleConnectionManager<SqliteConnection>;
