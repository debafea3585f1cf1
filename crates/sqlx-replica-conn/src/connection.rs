//! Stateful wrapper around a raw database handle

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, trace};

use crate::Result;
use crate::adapter::RawConnection;
use crate::error::Error;

/// A named database connection that tracks its own transaction state
///
/// The raw handle sits behind an async mutex so a single `Connection` can be
/// shared (typically as `Arc<Connection<C>>`) between the router and its callers.
/// Transaction state is only changed through [`begin_transaction`],
/// [`commit`] and [`rollback`]; [`in_transaction`] can be queried without
/// touching the handle.
///
/// [`begin_transaction`]: Connection::begin_transaction
/// [`commit`]: Connection::commit
/// [`rollback`]: Connection::rollback
/// [`in_transaction`]: Connection::in_transaction
pub struct Connection<C> {
   name: Option<String>,
   dsn: String,
   raw: Mutex<C>,
   transaction_depth: AtomicUsize,
}

impl<C: RawConnection> Connection<C> {
   pub fn new(dsn: impl Into<String>, raw: C) -> Self {
      Self {
         name: None,
         dsn: dsn.into(),
         raw: Mutex::new(raw),
         transaction_depth: AtomicUsize::new(0),
      }
   }

   pub fn set_name(&mut self, name: impl Into<String>) {
      self.name = Some(name.into());
   }

   pub fn name(&self) -> Option<&str> {
      self.name.as_deref()
   }

   /// DSN the raw handle was opened with
   pub fn dsn(&self) -> &str {
      &self.dsn
   }

   pub fn in_transaction(&self) -> bool {
      self.transaction_depth.load(Ordering::SeqCst) > 0
   }

   /// Start a transaction on the raw handle
   ///
   /// Fails with [`Error::TransactionAlreadyActive`] if one is already open.
   /// The state check and the `BEGIN` run under the handle lock, so at most one
   /// of several concurrent callers succeeds.
   pub async fn begin_transaction(&self) -> Result<()> {
      let mut raw = self.raw.lock().await;
      if self.in_transaction() {
         return Err(Error::TransactionAlreadyActive(self.label()));
      }

      raw.begin().await?;
      self.transaction_depth.store(1, Ordering::SeqCst);
      trace!(connection = %self.label(), "Transaction started");
      Ok(())
   }

   /// Commit the open transaction
   ///
   /// Fails with [`Error::NoActiveTransaction`] if none is open. If the backend
   /// rejects the `COMMIT`, the connection stays in its transaction until
   /// [`rollback`](Connection::rollback) clears it.
   pub async fn commit(&self) -> Result<()> {
      let mut raw = self.raw.lock().await;
      if !self.in_transaction() {
         return Err(Error::NoActiveTransaction(self.label()));
      }

      raw.commit().await?;
      self.transaction_depth.store(0, Ordering::SeqCst);
      trace!(connection = %self.label(), "Transaction committed");
      Ok(())
   }

   /// Roll back the open transaction
   ///
   /// Fails with [`Error::NoActiveTransaction`] if none is open. The connection
   /// leaves its transaction even if the backend rejects the `ROLLBACK`, since
   /// the backend may already have ended the transaction on its own (SQLite
   /// does after `INSERT OR ROLLBACK` conflicts). The backend error is still
   /// returned.
   pub async fn rollback(&self) -> Result<()> {
      let mut raw = self.raw.lock().await;
      if !self.in_transaction() {
         return Err(Error::NoActiveTransaction(self.label()));
      }

      let result = raw.rollback().await;
      self.transaction_depth.store(0, Ordering::SeqCst);
      match &result {
         Ok(()) => trace!(connection = %self.label(), "Transaction rolled back"),
         Err(e) => debug!(connection = %self.label(), error = %e, "Rollback failed, transaction state cleared"),
      }
      result
   }

   /// Lock and return the raw handle for backend-specific work
   ///
   /// Drop the guard before calling any transaction method on this connection;
   /// they need the same lock. Statements that open or close transactions
   /// directly on the handle are not tracked by [`in_transaction`](Connection::in_transaction).
   pub async fn wrapped_connection(&self) -> MutexGuard<'_, C> {
      self.raw.lock().await
   }

   fn label(&self) -> String {
      match &self.name {
         Some(name) => format!("'{}' ({})", name, self.dsn),
         None => format!("({})", self.dsn),
      }
   }
}

impl<C> fmt::Debug for Connection<C> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("Connection")
         .field("name", &self.name)
         .field("dsn", &self.dsn)
         .field(
            "transaction_depth",
            &self.transaction_depth.load(Ordering::SeqCst),
         )
         .finish_non_exhaustive()
   }
}
