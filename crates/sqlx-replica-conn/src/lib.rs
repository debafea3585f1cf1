//! # sqlx-replica-conn
//!
//! The connection layer underneath a primary/replica router: a thin stateful
//! wrapper around a raw database handle, and the adapter capability that opens
//! those handles from a configuration.
//!
//! ## Core Types
//!
//! - **[`Connection`]**: Wraps a raw handle, tracks transaction state and carries a name tag
//! - **[`ConnectionConfig`]**: DSN plus an ordered map of backend attributes
//! - **[`Adapter`]**: Opens raw handles for a backend and builds [`Connection`]s from them
//! - **[`RawConnection`]**: Transaction statements a backend handle must support
//! - **[`SqliteAdapter`]**: SQLx-backed SQLite adapter, applying attributes as PRAGMAs
//! - **[`Error`]**: Error type for connection operations
//!
//! ## Usage
//!
//! ```no_run
//! use sqlx_replica_conn::{Adapter, ConnectionConfig, SqliteAdapter};
//!
//! #[tokio::main]
//! async fn main() -> sqlx_replica_conn::Result<()> {
//!     let config = ConnectionConfig::new("sqlite::memory:").with_attribute("user_version", 7);
//!     let connection = SqliteAdapter.build(&config).await?;
//!
//!     connection.begin_transaction().await?;
//!     sqlx::query("CREATE TABLE users (name TEXT)")
//!         .execute(&mut *connection.wrapped_connection().await)
//!         .await?;
//!     connection.commit().await?;
//!     Ok(())
//! }
//! ```
//!
mod adapter;
mod config;
mod connection;
mod error;
mod sqlite;

pub use adapter::{Adapter, RawConnection};
pub use config::ConnectionConfig;
pub use connection::Connection;
pub use error::Error;
pub use sqlite::SqliteAdapter;

// Raw handle type produced by `SqliteAdapter`
pub use sqlx::SqliteConnection;

/// A type alias for Results with our custom Error type
pub type Result<T> = std::result::Result<T, Error>;
