//! Common interface of the connection managers

use std::future::Future;
use std::sync::Arc;

use sqlx_replica_conn::{Adapter, Connection, ConnectionConfig, RawConnection};
use tracing::debug;

use crate::Result;

/// Hands out write and read connections for one logical datastore
///
/// The query layer calls [`get_write_connection`](ConnectionManager::get_write_connection)
/// for mutating statements and [`get_read_connection`](ConnectionManager::get_read_connection)
/// for read-only ones; the manager decides which backend serves each.
pub trait ConnectionManager<C: RawConnection>: Send + Sync {
   fn name(&self) -> Option<&str>;

   fn get_write_connection<A>(
      &self,
      adapter: &A,
   ) -> impl Future<Output = Result<Arc<Connection<C>>>> + Send
   where
      A: Adapter<Raw = C>;

   fn get_read_connection<A>(
      &self,
      adapter: &A,
   ) -> impl Future<Output = Result<Arc<Connection<C>>>> + Send
   where
      A: Adapter<Raw = C>;
}

/// Build a connection through `adapter` and tag it with the manager's name
pub(crate) async fn build_connection<A: Adapter>(
   adapter: &A,
   config: &ConnectionConfig,
   name: Option<&str>,
   role: &'static str,
) -> Result<Arc<Connection<A::Raw>>> {
   let mut connection = adapter.build(config).await?;
   if let Some(name) = name {
      connection.set_name(name);
   }

   debug!(dsn = %config.dsn, name = ?name, role, "Built connection");
   Ok(Arc::new(connection))
}
