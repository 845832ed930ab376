//! WOWSQL client entry point.

use std::sync::Arc;

use crate::config::ClientConfig;
use crate::error::Result;
use crate::storage::StorageClient;
use crate::table::Table;
use crate::transport::{segment, HttpTransport, Request, Transport};
use crate::types::{TableList, TableSchema};

/// Client for one WOWSQL project
///
/// Cloning is cheap; clones share the same transport.
#[derive(Clone)]
pub struct WowSQL {
  transport: Arc<dyn Transport>,
}

impl WowSQL {
  /// Create a client that talks HTTP to the configured project
  pub fn new(config: ClientConfig) -> Result<Self> {
    let transport = HttpTransport::new(&config)?;
    tracing::debug!(url = %transport.base_url(), "created WOWSQL client");
    Ok(Self::with_transport(Arc::new(transport)))
  }

  /// Shorthand for `ClientConfig::builder(project_url, api_key)` with defaults
  pub fn connect(project_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
    Self::new(ClientConfig::builder(project_url, api_key).build()?)
  }

  /// Create a client from `WOWSQL_*` environment variables
  pub fn from_env() -> Result<Self> {
    Self::new(ClientConfig::from_env()?)
  }

  /// Create a client over a custom transport
  pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
    Self { transport }
  }

  pub fn transport(&self) -> Arc<dyn Transport> {
    self.transport.clone()
  }

  /// Handle to a table
  pub fn table(&self, name: impl Into<String>) -> Table {
    Table::new(self.transport.clone(), name)
  }

  /// Storage client sharing this client's transport
  pub fn storage(&self) -> StorageClient {
    StorageClient::new(self.transport.clone())
  }

  /// Names of all tables in the project
  pub async fn list_tables(&self) -> Result<Vec<String>> {
    let list: TableList = self.transport.send(Request::get("/tables")).await?.json()?;
    Ok(list.tables)
  }

  /// Column metadata for a table
  pub async fn get_table_schema(&self, table: &str) -> Result<TableSchema> {
    let request = Request::get(format!("/tables/{}/schema", segment(table)));
    self.transport.send(request).await?.json()
  }
}

impl std::fmt::Debug for WowSQL {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("WowSQL").finish_non_exhaustive()
  }
}
