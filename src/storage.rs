//! File storage client
//!
//! Uploads, downloads and listings against the project's object storage, plus the
//! storage quota. The quota can be cached for a fixed time so repeated uploads do
//! not each pay for an extra round trip.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::transport::{key_path, Request, Transport};

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Storage usage for the project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageQuota {
  pub used_bytes: u64,
  pub limit_bytes: u64,
  #[serde(default)]
  pub file_count: u64,
}

impl StorageQuota {
  pub fn available_bytes(&self) -> u64 {
    self.limit_bytes.saturating_sub(self.used_bytes)
  }
}

/// Stored file metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageFile {
  pub key: String,
  pub size: u64,
  #[serde(default)]
  pub content_type: Option<String>,
  #[serde(default)]
  pub etag: Option<String>,
  pub last_modified: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct FileList {
  files: Vec<StorageFile>,
}

#[derive(Debug, Clone)]
struct CachedQuota {
  fetched_at: Instant,
  quota: StorageQuota,
}

/// Storage client. Clones share the quota cache.
#[derive(Clone)]
pub struct StorageClient {
  transport: Arc<dyn Transport>,
  cache_ttl: Option<Duration>,
  cached: Arc<RwLock<Option<CachedQuota>>>,
}

impl StorageClient {
  pub fn new(transport: Arc<dyn Transport>) -> Self {
    Self {
      transport,
      cache_ttl: None,
      cached: Arc::new(RwLock::new(None)),
    }
  }

  /// Reuse a fetched quota for `ttl` before asking the server again
  pub fn with_quota_cache(mut self, ttl: Duration) -> Self {
    self.cache_ttl = Some(ttl);
    self
  }

  /// Current quota. `force_refresh` bypasses the cache.
  pub async fn quota(&self, force_refresh: bool) -> Result<StorageQuota> {
    if let (Some(ttl), false) = (self.cache_ttl, force_refresh) {
      if let Some(cached) = self.cached.read().await.as_ref() {
        if cached.fetched_at.elapsed() < ttl {
          return Ok(cached.quota.clone());
        }
      }
    }

    let quota: StorageQuota = self
      .transport
      .send(Request::get("/storage/quota"))
      .await?
      .json()?;

    if self.cache_ttl.is_some() {
      *self.cached.write().await = Some(CachedQuota {
        fetched_at: Instant::now(),
        quota: quota.clone(),
      });
    }
    Ok(quota)
  }

  /// Drop the cached quota
  pub async fn invalidate_quota(&self) {
    *self.cached.write().await = None;
  }

  /// Upload `data` under `key`.
  ///
  /// With `check_quota`, fails with [`Error::StorageLimitExceeded`] before sending
  /// if the file does not fit in the remaining space.
  pub async fn upload(
    &self,
    key: &str,
    data: Vec<u8>,
    content_type: Option<&str>,
    check_quota: bool,
  ) -> Result<StorageFile> {
    let required = data.len() as u64;
    if check_quota {
      let available = self.quota(false).await?.available_bytes();
      if required > available {
        tracing::warn!(key, required, available, "upload rejected by storage quota");
        return Err(Error::StorageLimitExceeded {
          required,
          available,
        });
      }
    }

    let request = Request::put(format!("/storage/files/{}", key_path(key)))
      .bytes(content_type.unwrap_or(DEFAULT_CONTENT_TYPE), data);
    tracing::debug!(key, size = required, "uploading file");

    let file: StorageFile = self.transport.send(request).await?.json()?;
    self.invalidate_quota().await;
    Ok(file)
  }

  /// Raw file contents
  pub async fn download(&self, key: &str) -> Result<Vec<u8>> {
    let request = Request::get(format!("/storage/files/{}", key_path(key)));
    Ok(self.transport.send(request).await?.body)
  }

  /// List files, optionally under a key prefix
  pub async fn list(&self, prefix: Option<&str>, limit: Option<u64>) -> Result<Vec<StorageFile>> {
    let mut params = Vec::new();
    if let Some(prefix) = prefix {
      params.push(("prefix".to_string(), prefix.to_string()));
    }
    if let Some(limit) = limit {
      params.push(("limit".to_string(), limit.to_string()));
    }

    let list: FileList = self
      .transport
      .send(Request::get("/storage/files").query(params))
      .await?
      .json()?;
    Ok(list.files)
  }

  pub async fn delete(&self, key: &str) -> Result<()> {
    let request = Request::delete(format!("/storage/files/{}", key_path(key)));
    self.transport.send(request).await?;
    self.invalidate_quota().await;
    Ok(())
  }
}

impl std::fmt::Debug for StorageClient {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StorageClient")
      .field("cache_ttl", &self.cache_ttl)
      .finish_non_exhaustive()
  }
}
