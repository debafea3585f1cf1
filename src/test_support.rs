//! In-memory adapter for unit tests

use std::sync::atomic::{AtomicUsize, Ordering};

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use sqlx_replica_conn::{Adapter, ConnectionConfig, RawConnection};

/// Raw handle remembering the configuration it was opened with
#[derive(Debug, Default)]
pub(crate) struct MockRaw {
   pub dsn: String,
   pub attributes: IndexMap<String, JsonValue>,
   pub statements: Vec<&'static str>,
}

impl RawConnection for MockRaw {
   async fn begin(&mut self) -> sqlx_replica_conn::Result<()> {
      self.statements.push("BEGIN");
      Ok(())
   }

   async fn commit(&mut self) -> sqlx_replica_conn::Result<()> {
      self.statements.push("COMMIT");
      Ok(())
   }

   async fn rollback(&mut self) -> sqlx_replica_conn::Result<()> {
      self.statements.push("ROLLBACK");
      Ok(())
   }
}

/// Adapter counting how many handles it opened, optionally refusing to connect
#[derive(Debug, Default)]
pub(crate) struct MockAdapter {
   opened: AtomicUsize,
   refuse: bool,
}

impl MockAdapter {
   pub fn refusing() -> Self {
      Self {
         refuse: true,
         ..Default::default()
      }
   }

   pub fn opened(&self) -> usize {
      self.opened.load(Ordering::SeqCst)
   }
}

impl Adapter for MockAdapter {
   type Raw = MockRaw;

   async fn open(&self, config: &ConnectionConfig) -> sqlx_replica_conn::Result<MockRaw> {
      if self.refuse {
         return Err(sqlx_replica_conn::Error::connection_failure(
            &config.dsn,
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused"),
         ));
      }

      self.opened.fetch_add(1, Ordering::SeqCst);
      Ok(MockRaw {
         dsn: config.dsn.clone(),
         attributes: config.attributes.clone(),
         statements: Vec::new(),
      })
   }
}

/// Selector always picking the same replica
#[derive(Debug)]
pub(crate) struct FixedSelector(pub usize);

impl crate::ReplicaSelector for FixedSelector {
   fn select(&self, _replica_count: usize) -> usize {
      self.0
   }
}
