//! Error types for the WOWSQL client SDK.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
  /// Non-2xx response. `body` is the raw error payload as returned by the server.
  #[error("API error ({status}): {message}")]
  Api {
    status: u16,
    message: String,
    body: serde_json::Value,
  },

  #[error("Connection error: {0}")]
  Connection(String),

  #[error("Timeout")]
  Timeout,

  #[error("Serialization error: {0}")]
  Serialization(String),

  #[error("Invalid query: {0}")]
  InvalidQuery(String),

  #[error("Configuration error: {0}")]
  Config(String),

  #[error("Storage limit exceeded: need {required} bytes, {available} available")]
  StorageLimitExceeded { required: u64, available: u64 },
}

impl Error {
  pub fn invalid_query(msg: impl Into<String>) -> Self {
    Self::InvalidQuery(msg.into())
  }

  pub fn config(msg: impl Into<String>) -> Self {
    Self::Config(msg.into())
  }

  /// HTTP status code, if this error came from a server response.
  pub fn status(&self) -> Option<u16> {
    match self {
      Self::Api { status, .. } => Some(*status),
      _ => None,
    }
  }

  /// Build an API error from a status code and the raw response bytes.
  pub(crate) fn from_response(status: u16, raw: &[u8]) -> Self {
    let body = serde_json::from_slice::<serde_json::Value>(raw)
      .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(raw).into_owned()));

    let message = ["detail", "message", "error"]
      .iter()
      .find_map(|key| body.get(*key).and_then(|v| v.as_str()))
      .map(str::to_string)
      .or_else(|| body.as_str().filter(|s| !s.is_empty()).map(str::to_string))
      .unwrap_or_else(|| format!("request failed with status {}", status));

    Self::Api {
      status,
      message,
      body,
    }
  }
}

impl From<serde_json::Error> for Error {
  fn from(e: serde_json::Error) -> Self {
    Self::Serialization(e.to_string())
  }
}

impl From<reqwest::Error> for Error {
  fn from(e: reqwest::Error) -> Self {
    if e.is_timeout() {
      Self::Timeout
    } else {
      Self::Connection(e.to_string())
    }
  }
}

pub type Result<T> = std::result::Result<T, Error>;
