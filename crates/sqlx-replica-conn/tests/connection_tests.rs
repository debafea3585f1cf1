use serde_json::json;
use sqlx_replica_conn::{Adapter, ConnectionConfig, Error, SqliteAdapter};
use tempfile::TempDir;

async fn user_version(conn: &sqlx_replica_conn::Connection<sqlx::SqliteConnection>) -> i64 {
   sqlx::query_scalar("PRAGMA user_version")
      .fetch_one(&mut *conn.wrapped_connection().await)
      .await
      .unwrap()
}

#[tokio::test]
async fn test_build_applies_attributes() {
   let config = ConnectionConfig::new("sqlite::memory:")
      .with_attribute("user_version", 42)
      .with_attribute("recursive_triggers", true);

   let conn = SqliteAdapter.build(&config).await.unwrap();

   assert_eq!(conn.dsn(), "sqlite::memory:");
   assert_eq!(conn.name(), None);
   assert_eq!(user_version(&conn).await, 42);

   // Off unless the attribute was applied
   let recursive_triggers: i64 = sqlx::query_scalar("PRAGMA recursive_triggers")
      .fetch_one(&mut *conn.wrapped_connection().await)
      .await
      .unwrap();
   assert_eq!(recursive_triggers, 1);
}

#[tokio::test]
async fn test_build_without_attributes() {
   let conn = SqliteAdapter
      .build(&ConnectionConfig::new("sqlite::memory:"))
      .await
      .unwrap();

   assert_eq!(user_version(&conn).await, 0);
   assert!(!conn.in_transaction());
}

#[tokio::test]
async fn test_build_rejects_unsupported_attribute() {
   let config = ConnectionConfig::new("sqlite::memory:").with_attribute("user_version", json!([1]));

   let err = SqliteAdapter.build(&config).await.unwrap_err();

   assert_eq!(err.error_code(), "CONNECTION_FAILURE");
   match err {
      Error::ConnectionFailure { dsn, source } => {
         assert_eq!(dsn, "sqlite::memory:");
         assert!(matches!(
            source.downcast_ref::<Error>(),
            Some(Error::InvalidAttribute { key, .. }) if key == "user_version"
         ));
      }
      other => panic!("Expected ConnectionFailure, got {:?}", other),
   }
}

#[tokio::test]
async fn test_build_reports_connection_failure() {
   let temp_dir = TempDir::new().unwrap();
   let missing = temp_dir.path().join("missing").join("replica.db");
   let dsn = format!("sqlite://{}?mode=ro", missing.display());

   let err = SqliteAdapter
      .build(&ConnectionConfig::new(dsn.clone()))
      .await
      .unwrap_err();

   match err {
      Error::ConnectionFailure { dsn: failed, .. } => assert_eq!(failed, dsn),
      other => panic!("Expected ConnectionFailure, got {:?}", other),
   }
}

#[tokio::test]
async fn test_rollback_discards_writes() {
   let conn = SqliteAdapter
      .build(&ConnectionConfig::new("sqlite::memory:"))
      .await
      .unwrap();

   sqlx::query("CREATE TABLE users (name TEXT)")
      .execute(&mut *conn.wrapped_connection().await)
      .await
      .unwrap();

   conn.begin_transaction().await.unwrap();
   sqlx::query("INSERT INTO users (name) VALUES ('Alice')")
      .execute(&mut *conn.wrapped_connection().await)
      .await
      .unwrap();
   conn.rollback().await.unwrap();

   let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
      .fetch_one(&mut *conn.wrapped_connection().await)
      .await
      .unwrap();
   assert_eq!(count, 0);
}

#[tokio::test]
async fn test_commit_persists_writes() {
   let conn = SqliteAdapter
      .build(&ConnectionConfig::new("sqlite::memory:"))
      .await
      .unwrap();

   sqlx::query("CREATE TABLE users (name TEXT)")
      .execute(&mut *conn.wrapped_connection().await)
      .await
      .unwrap();

   conn.begin_transaction().await.unwrap();
   assert!(conn.in_transaction());
   sqlx::query("INSERT INTO users (name) VALUES ('Alice')")
      .execute(&mut *conn.wrapped_connection().await)
      .await
      .unwrap();
   conn.commit().await.unwrap();
   assert!(!conn.in_transaction());

   let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
      .fetch_one(&mut *conn.wrapped_connection().await)
      .await
      .unwrap();
   assert_eq!(count, 1);
}

#[tokio::test]
async fn test_transaction_state_errors() {
   let conn = SqliteAdapter
      .build(&ConnectionConfig::new("sqlite::memory:"))
      .await
      .unwrap();

   assert!(conn.commit().await.unwrap_err().is_transaction_state());
   assert!(conn.rollback().await.unwrap_err().is_transaction_state());

   conn.begin_transaction().await.unwrap();
   let err = conn.begin_transaction().await.unwrap_err();
   assert!(matches!(err, Error::TransactionAlreadyActive(_)));

   // The original transaction is still usable
   conn.commit().await.unwrap();
}

#[tokio::test]
async fn test_rollback_recovers_after_backend_ended_transaction() {
   let conn = SqliteAdapter
      .build(&ConnectionConfig::new("sqlite::memory:"))
      .await
      .unwrap();

   sqlx::query("CREATE TABLE t (id INTEGER PRIMARY KEY)")
      .execute(&mut *conn.wrapped_connection().await)
      .await
      .unwrap();
   sqlx::query("INSERT INTO t VALUES (1)")
      .execute(&mut *conn.wrapped_connection().await)
      .await
      .unwrap();

   conn.begin_transaction().await.unwrap();
   sqlx::query("INSERT INTO t VALUES (2)")
      .execute(&mut *conn.wrapped_connection().await)
      .await
      .unwrap();

   // The conflict makes SQLite roll back and end the transaction itself
   let conflict = sqlx::query("INSERT OR ROLLBACK INTO t VALUES (1)")
      .execute(&mut *conn.wrapped_connection().await)
      .await;
   assert!(conflict.is_err());

   let err = conn.rollback().await.unwrap_err();
   assert!(matches!(err, Error::Sqlx(_)));
   assert!(!conn.in_transaction());

   conn.begin_transaction().await.unwrap();
   sqlx::query("INSERT INTO t VALUES (3)")
      .execute(&mut *conn.wrapped_connection().await)
      .await
      .unwrap();
   conn.commit().await.unwrap();
   assert!(!conn.in_transaction());

   let ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM t ORDER BY id")
      .fetch_all(&mut *conn.wrapped_connection().await)
      .await
      .unwrap();
   assert_eq!(ids, [1, 3]);
}
