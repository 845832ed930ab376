//! Basic example demonstrating WOWSQL Rust SDK usage.
//!
//! Run with `WOWSQL_PROJECT_URL` and `WOWSQL_API_KEY` set; `RUST_LOG=wowsql=debug`
//! shows every request the SDK sends.

use serde_json::{json, Value};
use wowsql::{HavingOperator, OrderKey, QueryResponse, SortDirection, WowSQL};

#[tokio::main]
async fn main() -> wowsql::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .compact()
    .init();

  let client = WowSQL::from_env()?;

  // List tables
  let tables = client.list_tables().await?;
  println!("Tables: {:?}", tables);

  let users = client.table("users");

  // Insert a row
  let created = users
    .create(&json!({
        "name": "Alice",
        "email": "alice@example.com",
        "age": 30
    }))
    .await?;
  println!("Inserted row: {:?}", created.id);

  // Simple query (GET with query parameters)
  let adults: QueryResponse<Value> = users
    .select(["id", "name", "email"])
    .gte("age", 18)
    .is_not_null("email")
    .order("created_at", SortDirection::Desc)
    .limit(10)
    .get()
    .await?;
  println!("Adults: {} of {}", adults.count, adults.total);

  // First match, or None
  let alice: Option<Value> = users.query().eq("email", "alice@example.com").first().await?;
  println!("Alice: {:?}", alice);

  // Advanced query (POST with JSON body)
  let by_age: QueryResponse<Value> = users
    .select(["age", "COUNT(*) as n"])
    .between("age", 18, 65)
    .group_by("age")
    .having("COUNT(*)", HavingOperator::Gte, 2)
    .order_by_many([OrderKey::desc("n"), OrderKey::asc("age")])
    .get()
    .await?;
  println!("Ages: {}", serde_json::to_string_pretty(&by_age.data)?);

  // Update and delete
  if let Some(id) = created.id.as_u64() {
    let updated = users.update(id, &json!({"age": 31})).await?;
    println!("Updated {} row(s)", updated.affected_rows);

    let deleted = users.delete(id).await?;
    println!("Deleted {} row(s)", deleted.affected_rows);
  }

  // Storage
  let storage = client.storage();
  let quota = storage.quota(false).await?;
  println!("Storage: {} of {} bytes used", quota.used_bytes, quota.limit_bytes);

  let file = storage
    .upload("demo/hello.txt", b"hello".to_vec(), Some("text/plain"), true)
    .await?;
  println!("Uploaded {} ({} bytes)", file.key, file.size);
  storage.delete(&file.key).await?;

  Ok(())
}
