//! WOWSQL Rust Client SDK
//!
//! An async HTTP client for WOWSQL, a hosted multi-tenant SQL database.
//!
//! # Example
//!
//! ```no_run
//! use serde_json::{json, Value};
//! use wowsql::{HavingOperator, QueryResponse, SortDirection, WowSQL};
//!
//! #[tokio::main]
//! async fn main() -> wowsql::Result<()> {
//!     let client = WowSQL::connect("myproject", "wowsql_anon_key")?;
//!     let users = client.table("users");
//!
//!     // Insert a row
//!     let created = users.create(&json!({"name": "Alice", "age": 30})).await?;
//!     println!("Created: {:?}", created.id);
//!
//!     // Simple query, sent as GET /users?select=...&filter=...
//!     let adults: QueryResponse<Value> = users
//!         .select(["id", "name"])
//!         .gte("age", 18)
//!         .order("created_at", SortDirection::Desc)
//!         .limit(10)
//!         .get()
//!         .await?;
//!     println!("{} of {} adults", adults.count, adults.total);
//!
//!     // Grouped query, sent as POST /products/query with a JSON body
//!     let popular: QueryResponse<Value> = client
//!         .table("products")
//!         .select(["category", "COUNT(*) as total"])
//!         .is_in("category", ["books", "games"])
//!         .group_by("category")
//!         .having("COUNT(*)", HavingOperator::Gt, 5)
//!         .get()
//!         .await?;
//!     println!("{:?}", popular.data);
//!
//!     Ok(())
//! }
//! ```

mod client;
pub mod config;
mod error;
pub mod query;
pub mod storage;
mod table;
pub mod transport;
pub mod types;

pub use client::WowSQL;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, Result};
pub use query::{
  Columns, FilterClause, FilterValue, HavingClause, HavingOperator, LogicalOp, Operator,
  OrderKey, OrderSpec, QueryBuilder, QueryOverrides, QueryState, SortDirection, WireForm,
  WireKind,
};
pub use storage::{StorageClient, StorageFile, StorageQuota};
pub use table::Table;
pub use transport::{Body, HttpTransport, Method, Request, Response, Transport};
pub use types::{
  ColumnInfo, CreateResponse, DeleteResponse, QueryResponse, TableSchema, UpdateResponse,
};
