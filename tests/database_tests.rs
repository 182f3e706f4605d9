use serde_json::{Value as JsonValue, json};
use sqlx_sqlite_orm::{Database, Error, PoolConfig};
use tempfile::TempDir;

async fn create_test_db(max_connections: u32) -> (Database, TempDir) {
   let temp_dir = TempDir::new().expect("Failed to create temp directory");
   let config = PoolConfig {
      max_connections,
      acquire_timeout_secs: Some(2),
      ..PoolConfig::new(temp_dir.path().join("test.db"))
   };
   let db = Database::connect(config)
      .await
      .expect("Failed to connect to test database");

   (db, temp_dir)
}

async fn seed_numbers(db: &Database, count: i64) {
   db.execute("create table numbers (n integer primary key, label text)", vec![])
      .await
      .unwrap();
   for n in 1..=count {
      db.execute(
         "insert into numbers (n, label) values (?, ?)",
         vec![json!(n), json!(format!("n{}", n))],
      )
      .await
      .unwrap();
   }
}

#[tokio::test]
async fn test_select_binds_markers_in_order() {
   let (db, _temp) = create_test_db(2).await;

   let rows = db
      .select("select ? as a, ? as b, ? as c", vec![json!(1), json!("x"), json!(null)])
      .await
      .unwrap();

   assert_eq!(rows.len(), 1);
   let keys: Vec<&str> = rows[0].keys().map(String::as_str).collect();
   assert_eq!(keys, ["a", "b", "c"]);
   assert_eq!(rows[0]["a"], json!(1));
   assert_eq!(rows[0]["b"], json!("x"));
   assert_eq!(rows[0]["c"], json!(null));
}

#[tokio::test]
async fn test_boolean_column_reads_back_as_integer() {
   let (db, _temp) = create_test_db(1).await;
   db.execute("create table flags (id integer primary key, on_off boolean)", vec![])
      .await
      .unwrap();
   db.execute(
      "insert into flags (id, on_off) values (?, ?), (?, ?)",
      vec![json!(1), json!(true), json!(2), json!(false)],
   )
   .await
   .unwrap();

   let rows = db
      .select("select on_off from flags order by id", vec![])
      .await
      .unwrap();
   assert_eq!(rows[0]["on_off"], json!(1));
   assert_eq!(rows[1]["on_off"], json!(0));
}

#[tokio::test]
async fn test_select_all_and_limited() {
   let (db, _temp) = create_test_db(2).await;
   seed_numbers(&db, 12).await;

   let all = db
      .select("select n from numbers order by n", vec![])
      .await
      .unwrap();
   assert_eq!(all.len(), 12);

   let first = db
      .select("select n, label from numbers where n > ? order by n", vec![json!(4)])
      .limit(3)
      .await
      .unwrap();
   let ns: Vec<_> = first.iter().map(|row| row["n"].clone()).collect();
   assert_eq!(ns, vec![json!(5), json!(6), json!(7)]);
   assert_eq!(first[0]["label"], json!("n5"));

   let none = db
      .select("select n from numbers", vec![])
      .limit(0)
      .await
      .unwrap();
   assert!(none.is_empty());
}

#[tokio::test]
async fn test_execute_returns_affected_rows() {
   let (db, _temp) = create_test_db(2).await;
   seed_numbers(&db, 5).await;

   let affected = db
      .execute("update numbers set label = ? where n <= ?", vec![json!("low"), json!(3)])
      .await
      .unwrap();
   assert_eq!(affected, 3);

   let affected = db
      .execute("delete from numbers where n = ?", vec![json!(99)])
      .await
      .unwrap();
   assert_eq!(affected, 0);
}

#[tokio::test]
async fn test_explicit_transaction_commits() {
   let (db, _temp) = create_test_db(2).await;
   seed_numbers(&db, 1).await;

   let affected = db
      .execute("insert into numbers (n, label) values (?, ?)", vec![json!(2), json!("two")])
      .autocommit(false)
      .await
      .unwrap();
   assert_eq!(affected, 1);

   let rows = db
      .select("select label from numbers where n = ?", vec![json!(2)])
      .await
      .unwrap();
   assert_eq!(rows[0]["label"], json!("two"));
}

async fn count_numbers(db: &Database) -> JsonValue {
   let rows = db
      .select("select count(*) as n from numbers", vec![])
      .await
      .unwrap();
   rows[0]["n"].clone()
}

// `or fail` keeps the rows a statement inserted before the failing one, so
// only an explicit rollback removes them
const PARTIAL_INSERT: &str =
   "insert or fail into numbers (n, label) values (?, ?), (?, ?), (?, ?)";

fn partial_insert_args() -> Vec<JsonValue> {
   vec![
      json!(2),
      json!("two"),
      json!(3),
      json!("three"),
      json!(1),
      json!("dup"),
   ]
}

#[tokio::test]
async fn test_failed_transaction_rolls_back_and_releases() {
   // One connection: every later call proves the failed one gave it back
   let (db, _temp) = create_test_db(1).await;
   seed_numbers(&db, 1).await;

   let err = db
      .execute(PARTIAL_INSERT, partial_insert_args())
      .autocommit(false)
      .await
      .unwrap_err();

   assert!(matches!(err, Error::Execution(_)));
   assert!(err.error_code().starts_with("SQLITE_"));

   // Rows 2 and 3 were inserted before the conflict and must be gone
   assert_eq!(count_numbers(&db).await, json!(1));

   // A new transaction can only begin if the failed one was closed out
   db.execute("begin", vec![]).await.unwrap();
   db.execute("commit", vec![]).await.unwrap();

   let rows = db
      .select("select label from numbers where n = ?", vec![json!(1)])
      .await
      .unwrap();
   assert_eq!(rows[0]["label"], json!("n1"));
}

#[tokio::test]
async fn test_autocommit_failure_keeps_partial_rows() {
   let (db, _temp) = create_test_db(1).await;
   seed_numbers(&db, 1).await;

   let err = db
      .execute(PARTIAL_INSERT, partial_insert_args())
      .autocommit(true)
      .await
      .unwrap_err();
   assert!(matches!(err, Error::Execution(_)));

   // No transaction boundary: the engine kept what the statement did before failing
   assert_eq!(count_numbers(&db).await, json!(3));
}

#[tokio::test]
async fn test_autocommit_failure_propagates() {
   let (db, _temp) = create_test_db(1).await;

   let err = db
      .execute("insert into missing_table values (?)", vec![json!(1)])
      .await
      .unwrap_err();
   assert!(matches!(err, Error::Execution(_)));

   // Connection is still usable
   assert!(db.select("select 1 as one", vec![]).await.is_ok());
}

#[tokio::test]
async fn test_autocommit_default_from_config() {
   let temp_dir = TempDir::new().unwrap();
   let config = PoolConfig {
      autocommit: false,
      ..PoolConfig::new(temp_dir.path().join("tx.db"))
   };
   let db = Database::connect(config).await.unwrap();
   assert!(!db.pool().autocommit_default());

   db.execute("create table t (id integer primary key)", vec![])
      .await
      .unwrap();
   db.execute("insert into t (id) values (?)", vec![json!(1)])
      .await
      .unwrap();

   let rows = db.select("select count(*) as n from t", vec![]).await.unwrap();
   assert_eq!(rows[0]["n"], json!(1));

   db.close().await;
}

#[tokio::test]
async fn test_closed_database_rejects_statements() {
   let (db, _temp) = create_test_db(1).await;
   db.close().await;

   let err = db.select("select 1", vec![]).await.unwrap_err();
   assert_eq!(err.error_code(), "POOL_CLOSED");
}

#[tokio::test]
async fn test_missing_database_path() {
   let err = Database::connect(PoolConfig::default()).await.unwrap_err();
   assert!(matches!(
      err,
      Error::Pool(sqlx_sqlite_pool::Error::Configuration(_))
   ));
}
