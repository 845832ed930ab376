//! Response types returned by the API.

use serde::{Deserialize, Serialize};

/// Paginated result envelope returned by every row-fetching call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse<T> {
  pub data: Vec<T>,
  /// Rows in this page
  #[serde(default)]
  pub count: u64,
  /// Matching rows on the server
  #[serde(default)]
  pub total: u64,
  #[serde(default)]
  pub limit: u64,
  #[serde(default)]
  pub offset: u64,
}

impl<T> QueryResponse<T> {
  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  /// First row of the page, consuming the envelope
  pub fn into_first(self) -> Option<T> {
    self.data.into_iter().next()
  }
}

/// Result of inserting a row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateResponse {
  pub id: serde_json::Value,
  #[serde(default)]
  pub message: String,
}

/// Result of updating a row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateResponse {
  #[serde(default)]
  pub message: String,
  #[serde(default)]
  pub affected_rows: u64,
}

/// Result of deleting a row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
  #[serde(default)]
  pub message: String,
  #[serde(default)]
  pub affected_rows: u64,
}

/// Column metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
  pub name: String,
  #[serde(rename = "type")]
  pub data_type: String,
  #[serde(default)]
  pub nullable: bool,
  #[serde(default)]
  pub key: Option<String>,
  #[serde(default)]
  pub default: Option<serde_json::Value>,
  #[serde(default)]
  pub extra: Option<String>,
}

/// Table metadata as returned by `GET /tables/{name}/schema`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
  pub table: String,
  pub columns: Vec<ColumnInfo>,
  #[serde(default)]
  pub primary_key: Option<String>,
  #[serde(default)]
  pub row_count: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TableList {
  pub tables: Vec<String>,
}
