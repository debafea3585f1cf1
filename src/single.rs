//! Manager serving reads and writes from one connection

use std::sync::Arc;

use sqlx_replica_conn::{Adapter, Connection, ConnectionConfig, RawConnection};
use tokio::sync::OnceCell;

use crate::error::{Error, Result};
use crate::manager::{ConnectionManager, build_connection};

/// Connection manager for a datastore without replicas
///
/// The connection is built on first request and returned for both reads and
/// writes.
#[derive(Debug)]
pub struct SingleConnectionManager<C> {
   name: Option<String>,
   config: Option<ConnectionConfig>,
   connection: OnceCell<Arc<Connection<C>>>,
}

impl<C: RawConnection> Default for SingleConnectionManager<C> {
   fn default() -> Self {
      Self {
         name: None,
         config: None,
         connection: OnceCell::new(),
      }
   }
}

impl<C: RawConnection> SingleConnectionManager<C> {
   pub fn new() -> Self {
      Self::default()
   }

   pub fn set_name(&mut self, name: impl Into<String>) {
      self.name = Some(name.into());
   }

   pub fn name(&self) -> Option<&str> {
      self.name.as_deref()
   }

   pub fn set_configuration(&mut self, config: ConnectionConfig) {
      self.config = Some(config);
   }

   pub fn configuration(&self) -> Option<&ConnectionConfig> {
      self.config.as_ref()
   }

   /// Return the connection, building it on first use
   ///
   /// Fails with [`Error::InvalidConfiguration`] if no configuration was set.
   pub async fn get_connection<A>(&self, adapter: &A) -> Result<Arc<Connection<C>>>
   where
      A: Adapter<Raw = C>,
   {
      let config = self
         .config
         .as_ref()
         .ok_or_else(|| Error::InvalidConfiguration("no configuration set".to_string()))?;

      let connection = self
         .connection
         .get_or_try_init(|| build_connection(adapter, config, self.name(), "single"))
         .await?;

      Ok(Arc::clone(connection))
   }
}

impl<C: RawConnection> ConnectionManager<C> for SingleConnectionManager<C> {
   fn name(&self) -> Option<&str> {
      SingleConnectionManager::name(self)
   }

   async fn get_write_connection<A>(&self, adapter: &A) -> Result<Arc<Connection<C>>>
   where
      A: Adapter<Raw = C>,
   {
      self.get_connection(adapter).await
   }

   async fn get_read_connection<A>(&self, adapter: &A) -> Result<Arc<Connection<C>>>
   where
      A: Adapter<Raw = C>,
   {
      self.get_connection(adapter).await
   }
}
