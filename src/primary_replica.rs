//! Router splitting reads and writes between one primary and its replicas

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use sqlx_replica_conn::{Adapter, Connection, ConnectionConfig, RawConnection};
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, trace};

use crate::config::ReplicaSetConfig;
use crate::error::{Error, Result};
use crate::manager::{ConnectionManager, build_connection};
use crate::selector::{RandomReplicaSelector, ReplicaSelector};

/// Where read connections come from once the first read has been served
#[derive(Debug)]
enum ReadSource<C> {
   /// No read connection requested yet
   Unbuilt,
   /// No replicas were configured; reads share the write connection instance
   AliasOfWrite,
   /// Connection built from one of the replica configurations
   Independent(Arc<Connection<C>>),
}

/// Connection manager for one writable primary and zero or more read-only replicas
///
/// Connections are built lazily through the [`Adapter`] passed to each call and
/// cached for the lifetime of the manager: the first write request builds the
/// primary connection, the first read request picks one replica at random (or
/// aliases the primary when there are no replicas). Reads are sent to the
/// primary instead of the cached replica while
///
/// - [`set_force_primary_connection(true)`](PrimaryReplicaManager::set_force_primary_connection)
///   is in effect, or
/// - the primary connection has an open transaction, so reads observe its
///   uncommitted writes.
///
/// Configuration set after a connection of that role has been cached has no
/// effect on the cached instance.
///
/// All getters take `&self`; share the manager as `Arc<PrimaryReplicaManager<_>>`
/// between tasks. Concurrent first requests build each connection only once.
///
/// # Example
///
/// ```no_run
/// use sqlx_replica_conn::{ConnectionConfig, SqliteAdapter};
/// use sqlx_replica_router::SqlitePrimaryReplicaManager;
///
/// # async fn example() -> Result<(), sqlx_replica_router::Error> {
/// let mut manager = SqlitePrimaryReplicaManager::new();
/// manager.set_name("bookstore");
/// manager.set_write_configuration(ConnectionConfig::new("sqlite://primary.db?mode=rwc"));
/// manager.set_read_configuration(vec![
///     ConnectionConfig::new("sqlite://replica-1.db?mode=ro"),
///     ConnectionConfig::new("sqlite://replica-2.db?mode=ro"),
/// ]);
///
/// let writer = manager.get_write_connection(&SqliteAdapter).await?;
/// let reader = manager.get_read_connection(&SqliteAdapter).await?;
///
/// writer.begin_transaction().await?;
/// // Routed to the primary until the transaction ends
/// let in_tx_reader = manager.get_read_connection(&SqliteAdapter).await?;
/// writer.commit().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PrimaryReplicaManager<C> {
   name: Option<String>,
   write_config: Option<ConnectionConfig>,
   read_configs: Vec<ConnectionConfig>,
   force_primary: AtomicBool,
   selector: Box<dyn ReplicaSelector>,
   write_connection: OnceCell<Arc<Connection<C>>>,
   read_source: Mutex<ReadSource<C>>,
}

impl<C: RawConnection> Default for PrimaryReplicaManager<C> {
   fn default() -> Self {
      Self {
         name: None,
         write_config: None,
         read_configs: Vec::new(),
         force_primary: AtomicBool::new(false),
         selector: Box::new(RandomReplicaSelector),
         write_connection: OnceCell::new(),
         read_source: Mutex::new(ReadSource::Unbuilt),
      }
   }
}

impl<C: RawConnection> PrimaryReplicaManager<C> {
   pub fn new() -> Self {
      Self::default()
   }

   /// Create a manager from a loaded [`ReplicaSetConfig`]
   pub fn from_config(config: ReplicaSetConfig) -> Self {
      Self {
         name: config.name,
         write_config: config.write,
         read_configs: config.read,
         force_primary: AtomicBool::new(config.force_primary),
         ..Self::default()
      }
   }

   pub fn set_name(&mut self, name: impl Into<String>) {
      self.name = Some(name.into());
   }

   pub fn name(&self) -> Option<&str> {
      self.name.as_deref()
   }

   /// Set the primary configuration. No connection is built until requested.
   pub fn set_write_configuration(&mut self, config: ConnectionConfig) {
      self.write_config = Some(config);
   }

   pub fn write_configuration(&self) -> Option<&ConnectionConfig> {
      self.write_config.as_ref()
   }

   /// Set the replica configurations, possibly none. No connection is built until requested.
   pub fn set_read_configuration(&mut self, configs: Vec<ConnectionConfig>) {
      self.read_configs = configs;
   }

   pub fn read_configuration(&self) -> &[ConnectionConfig] {
      &self.read_configs
   }

   /// Route every read to the primary while `force` is true
   pub fn set_force_primary_connection(&self, force: bool) {
      self.force_primary.store(force, Ordering::SeqCst);
   }

   pub fn is_force_primary_connection(&self) -> bool {
      self.force_primary.load(Ordering::SeqCst)
   }

   /// Replace the policy picking the replica behind the read connection
   pub fn set_replica_selector(&mut self, selector: impl ReplicaSelector + 'static) {
      self.selector = Box::new(selector);
   }

   /// Return the primary connection, building it on first use
   ///
   /// Fails with [`Error::InvalidConfiguration`] if no write configuration was set.
   /// Every call returns the same instance.
   pub async fn get_write_connection<A>(&self, adapter: &A) -> Result<Arc<Connection<C>>>
   where
      A: Adapter<Raw = C>,
   {
      let config = self.write_config.as_ref().ok_or_else(|| {
         Error::InvalidConfiguration("no write configuration set".to_string())
      })?;

      let connection = self
         .write_connection
         .get_or_try_init(|| build_connection(adapter, config, self.name(), "write"))
         .await?;

      Ok(Arc::clone(connection))
   }

   /// Return the connection that should serve a read-only statement
   ///
   /// Decided in order:
   ///
   /// 1. forced primary: the write connection
   /// 2. primary already built and in a transaction: the write connection
   /// 3. read connection already cached: that connection (or the write
   ///    connection it aliases)
   /// 4. no replicas configured: the write connection, which from then on also
   ///    serves as the read connection
   /// 5. otherwise: a connection built from a randomly selected replica
   ///    configuration, cached for later reads
   pub async fn get_read_connection<A>(&self, adapter: &A) -> Result<Arc<Connection<C>>>
   where
      A: Adapter<Raw = C>,
   {
      if self.is_force_primary_connection() {
         debug!(name = ?self.name, "Primary connection forced, routing read to primary");
         return self.get_write_connection(adapter).await;
      }

      if let Some(write) = self.write_connection.get()
         && write.in_transaction()
      {
         debug!(name = ?self.name, "Primary in transaction, routing read to primary");
         return Ok(Arc::clone(write));
      }

      let mut source = self.read_source.lock().await;
      match &*source {
         ReadSource::Independent(connection) => {
            trace!(dsn = %connection.dsn(), "Reusing cached read connection");
            return Ok(Arc::clone(connection));
         }
         ReadSource::AliasOfWrite => return self.get_write_connection(adapter).await,
         ReadSource::Unbuilt => {}
      }

      if self.read_configs.is_empty() {
         let write = self.get_write_connection(adapter).await?;
         debug!(name = ?self.name, "No replicas configured, primary serves reads");
         *source = ReadSource::AliasOfWrite;
         return Ok(write);
      }

      let index = self.selector.select(self.read_configs.len());
      let config = self.read_configs.get(index).ok_or_else(|| {
         Error::InvalidConfiguration(format!(
            "replica selector chose index {} of {} read configurations",
            index,
            self.read_configs.len()
         ))
      })?;

      let connection = build_connection(adapter, config, self.name(), "read").await?;
      *source = ReadSource::Independent(Arc::clone(&connection));
      Ok(connection)
   }
}

impl<C: RawConnection> ConnectionManager<C> for PrimaryReplicaManager<C> {
   fn name(&self) -> Option<&str> {
      PrimaryReplicaManager::name(self)
   }

   async fn get_write_connection<A>(&self, adapter: &A) -> Result<Arc<Connection<C>>>
   where
      A: Adapter<Raw = C>,
   {
      PrimaryReplicaManager::get_write_connection(self, adapter).await
   }

   async fn get_read_connection<A>(&self, adapter: &A) -> Result<Arc<Connection<C>>>
   where
      A: Adapter<Raw = C>,
   {
      PrimaryReplicaManager::get_read_connection(self, adapter).await
   }
}
