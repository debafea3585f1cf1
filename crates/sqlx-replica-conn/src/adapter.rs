//! Adapter capability abstracting the concrete database backend

use std::future::Future;

use tracing::debug;

use crate::Result;
use crate::config::ConnectionConfig;
use crate::connection::Connection;

/// Transaction statements a raw backend handle must be able to run
///
/// [`Connection`] owns the transaction bookkeeping; implementations only issue
/// the statements and report backend failures.
pub trait RawConnection: Send + 'static {
   fn begin(&mut self) -> impl Future<Output = Result<()>> + Send;

   fn commit(&mut self) -> impl Future<Output = Result<()>> + Send;

   fn rollback(&mut self) -> impl Future<Output = Result<()>> + Send;
}

/// Opens raw handles for one backend and wraps them into [`Connection`]s
///
/// There is no retry: a failure to open surfaces to the caller as
/// [`Error::ConnectionFailure`](crate::Error::ConnectionFailure).
pub trait Adapter: Send + Sync {
   /// Raw handle type produced by this backend
   type Raw: RawConnection;

   /// Open a handle using `config.dsn` and apply every entry of `config.attributes`
   fn open(&self, config: &ConnectionConfig) -> impl Future<Output = Result<Self::Raw>> + Send;

   /// Open a handle and wrap it into an unnamed [`Connection`]
   fn build(
      &self,
      config: &ConnectionConfig,
   ) -> impl Future<Output = Result<Connection<Self::Raw>>> + Send {
      async move {
         let raw = self.open(config).await?;
         debug!(
            dsn = %config.dsn,
            attributes = config.attributes.len(),
            "Opened database connection"
         );
         Ok(Connection::new(config.dsn.clone(), raw))
      }
   }
}
