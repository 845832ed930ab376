//! Table handle: CRUD calls and the entry points for building queries.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::query::{Columns, FilterValue, Operator, QueryBuilder};
use crate::transport::{segment, Request, Transport};
use crate::types::{CreateResponse, DeleteResponse, QueryResponse, UpdateResponse};

/// Handle to one table. Cheap to clone.
#[derive(Clone)]
pub struct Table {
  transport: Arc<dyn Transport>,
  name: String,
}

impl Table {
  pub fn new(transport: Arc<dyn Transport>, name: impl Into<String>) -> Self {
    Self {
      transport,
      name: name.into(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// Start an empty query
  pub fn query(&self) -> QueryBuilder {
    QueryBuilder::new(self.transport.clone(), self.name.clone())
  }

  /// Start a query with a projection
  pub fn select(&self, columns: impl Into<Columns>) -> QueryBuilder {
    self.query().select(columns)
  }

  /// Start a query with one filter
  pub fn filter(
    &self,
    column: impl Into<String>,
    operator: Operator,
    value: impl Into<FilterValue>,
  ) -> QueryBuilder {
    self.query().filter(column, operator, value)
  }

  /// Fetch rows with no filters (server-side default page size)
  pub async fn get<T: DeserializeOwned>(&self) -> Result<QueryResponse<T>> {
    self.query().get().await
  }

  /// Fetch one row by primary key
  pub async fn get_by_id<T: DeserializeOwned>(&self, id: impl fmt::Display) -> Result<T> {
    let request = Request::get(self.row_path(&id));
    self.transport.send(request).await?.json()
  }

  /// Insert a row
  pub async fn create<D: Serialize + ?Sized>(&self, data: &D) -> Result<CreateResponse> {
    let request = Request::post(self.path()).json(data)?;
    tracing::debug!(table = %self.name, "creating row");
    self.transport.send(request).await?.json()
  }

  /// Update a row by primary key with the given column values
  pub async fn update<D: Serialize + ?Sized>(
    &self,
    id: impl fmt::Display,
    data: &D,
  ) -> Result<UpdateResponse> {
    let request = Request::patch(self.row_path(&id)).json(data)?;
    tracing::debug!(table = %self.name, %id, "updating row");
    self.transport.send(request).await?.json()
  }

  /// Delete a row by primary key
  pub async fn delete(&self, id: impl fmt::Display) -> Result<DeleteResponse> {
    let request = Request::delete(self.row_path(&id));
    tracing::debug!(table = %self.name, %id, "deleting row");
    self.transport.send(request).await?.json()
  }

  /// Number of rows in the table, read from the envelope total
  pub async fn count(&self) -> Result<u64> {
    let page: QueryResponse<Value> = self.query().limit(1).get().await?;
    Ok(page.total)
  }

  fn path(&self) -> String {
    format!("/{}", segment(&self.name))
  }

  fn row_path(&self, id: &dyn fmt::Display) -> String {
    format!("/{}/{}", segment(&self.name), segment(&id.to_string()))
  }
}

impl fmt::Debug for Table {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Table").field("name", &self.name).finish()
  }
}
