//! Client configuration
//!
//! Provides a builder for the settings shared by every request the client makes.

use std::time::Duration;

use crate::error::{Error, Result};

/// Default REST API base path
pub const DEFAULT_BASE_PATH: &str = "/api/v2";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Domain appended to bare project slugs
pub const PROJECT_DOMAIN: &str = "wowsql.com";

/// User-Agent sent with every request
pub const USER_AGENT: &str = concat!("wowsql-rust/", env!("CARGO_PKG_VERSION"));

/// Configuration for a [`WowSQL`](crate::WowSQL) client
#[derive(Debug, Clone)]
pub struct ClientConfig {
  /// Normalized project URL, e.g. `https://myproject.wowsql.com`
  pub project_url: String,
  pub api_key: String,
  /// Path prefix for all API routes (default: `/api/v2`)
  pub base_path: String,
  pub timeout: Duration,
  pub user_agent: String,
}

impl ClientConfig {
  pub fn builder(
    project_url: impl Into<String>,
    api_key: impl Into<String>,
  ) -> ClientConfigBuilder {
    ClientConfigBuilder::new(project_url, api_key)
  }

  /// Read configuration from `WOWSQL_PROJECT_URL`, `WOWSQL_API_KEY` and the
  /// optional `WOWSQL_TIMEOUT_SECS`.
  pub fn from_env() -> Result<Self> {
    let project_url = std::env::var("WOWSQL_PROJECT_URL")
      .map_err(|_| Error::config("WOWSQL_PROJECT_URL is not set"))?;
    let api_key =
      std::env::var("WOWSQL_API_KEY").map_err(|_| Error::config("WOWSQL_API_KEY is not set"))?;

    let mut builder = Self::builder(project_url, api_key);
    if let Ok(secs) = std::env::var("WOWSQL_TIMEOUT_SECS") {
      let secs: u64 = secs
        .trim()
        .parse()
        .map_err(|_| Error::config(format!("WOWSQL_TIMEOUT_SECS is not a number: {}", secs)))?;
      builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build()
  }

  /// Full URL that API paths are appended to.
  pub fn api_url(&self) -> String {
    format!("{}{}", self.project_url, self.base_path)
  }
}

/// Builder for [`ClientConfig`]
#[derive(Debug)]
pub struct ClientConfigBuilder {
  project_url: String,
  api_key: String,
  base_path: String,
  timeout: Duration,
  user_agent: String,
}

impl ClientConfigBuilder {
  pub fn new(project_url: impl Into<String>, api_key: impl Into<String>) -> Self {
    Self {
      project_url: project_url.into(),
      api_key: api_key.into(),
      base_path: DEFAULT_BASE_PATH.to_string(),
      timeout: DEFAULT_TIMEOUT,
      user_agent: USER_AGENT.to_string(),
    }
  }

  /// Set the API base path (default: `/api/v2`)
  pub fn base_path(mut self, path: impl Into<String>) -> Self {
    self.base_path = path.into();
    self
  }

  /// Set the per-request timeout (default: 30 seconds)
  pub fn timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
    self.user_agent = agent.into();
    self
  }

  pub fn build(self) -> Result<ClientConfig> {
    if self.api_key.trim().is_empty() {
      return Err(Error::config("API key must not be empty"));
    }

    Ok(ClientConfig {
      project_url: normalize_project_url(&self.project_url)?,
      api_key: self.api_key,
      base_path: normalize_base_path(&self.base_path),
      timeout: self.timeout,
      user_agent: self.user_agent,
    })
  }
}

/// Turn a project slug, bare host or full URL into a base URL without a trailing slash.
fn normalize_project_url(raw: &str) -> Result<String> {
  let url = raw.trim().trim_end_matches('/');
  if url.is_empty() {
    return Err(Error::config("project URL must not be empty"));
  }

  if url.starts_with("http://") || url.starts_with("https://") {
    Ok(url.to_string())
  } else if url.contains('.') || url.contains(':') {
    Ok(format!("https://{}", url))
  } else {
    Ok(format!("https://{}.{}", url, PROJECT_DOMAIN))
  }
}

fn normalize_base_path(raw: &str) -> String {
  let path = raw.trim().trim_end_matches('/');
  if path.is_empty() {
    String::new()
  } else if path.starts_with('/') {
    path.to_string()
  } else {
    format!("/{}", path)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_config() {
    let config = ClientConfig::builder("https://demo.wowsql.com", "wowsql_anon_key")
      .build()
      .unwrap();

    assert_eq!(config.project_url, "https://demo.wowsql.com");
    assert_eq!(config.api_key, "wowsql_anon_key");
    assert_eq!(config.base_path, "/api/v2");
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert!(config.user_agent.starts_with("wowsql-rust/"));
  }

  #[test]
  fn test_project_slug_expands_to_domain() {
    let config = ClientConfig::builder("myproject", "key").build().unwrap();
    assert_eq!(config.project_url, "https://myproject.wowsql.com");
    assert_eq!(config.api_url(), "https://myproject.wowsql.com/api/v2");
  }

  #[test]
  fn test_bare_host_gets_https() {
    let config = ClientConfig::builder("db.example.com/", "key").build().unwrap();
    assert_eq!(config.project_url, "https://db.example.com");
  }

  #[test]
  fn test_http_url_kept() {
    let config = ClientConfig::builder("http://localhost:8000/", "key")
      .build()
      .unwrap();
    assert_eq!(config.project_url, "http://localhost:8000");
  }

  #[test]
  fn test_custom_base_path_and_timeout() {
    let config = ClientConfig::builder("myproject", "key")
      .base_path("api/v1/")
      .timeout(Duration::from_secs(5))
      .user_agent("my-app/1.0")
      .build()
      .unwrap();

    assert_eq!(config.base_path, "/api/v1");
    assert_eq!(config.timeout, Duration::from_secs(5));
    assert_eq!(config.user_agent, "my-app/1.0");
    assert_eq!(config.api_url(), "https://myproject.wowsql.com/api/v1");
  }

  #[test]
  fn test_empty_base_path() {
    let config = ClientConfig::builder("myproject", "key")
      .base_path("")
      .build()
      .unwrap();
    assert_eq!(config.api_url(), "https://myproject.wowsql.com");
  }

  #[test]
  fn test_empty_api_key_rejected() {
    let err = ClientConfig::builder("myproject", "  ").build().unwrap_err();
    assert!(matches!(err, Error::Config(_)));
  }

  #[test]
  fn test_empty_project_url_rejected() {
    let err = ClientConfig::builder("", "key").build().unwrap_err();
    assert!(matches!(err, Error::Config(_)));
  }
}
