//! HTTP transport used by every client call.
//!
//! The SDK talks to the server only through [`Transport`]. [`HttpTransport`] is the
//! reqwest-backed implementation; tests and embedders can plug in their own.

use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// HTTP methods used by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
  Get,
  Post,
  Put,
  Patch,
  Delete,
}

impl fmt::Display for Method {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Method::Get => write!(f, "GET"),
      Method::Post => write!(f, "POST"),
      Method::Put => write!(f, "PUT"),
      Method::Patch => write!(f, "PATCH"),
      Method::Delete => write!(f, "DELETE"),
    }
  }
}

impl From<Method> for reqwest::Method {
  fn from(method: Method) -> Self {
    match method {
      Method::Get => reqwest::Method::GET,
      Method::Post => reqwest::Method::POST,
      Method::Put => reqwest::Method::PUT,
      Method::Patch => reqwest::Method::PATCH,
      Method::Delete => reqwest::Method::DELETE,
    }
  }
}

/// Request payload
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Body {
  #[default]
  Empty,
  Json(serde_json::Value),
  Bytes { content_type: String, data: Vec<u8> },
}

/// A single API request, relative to the configured API base URL
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
  pub method: Method,
  pub path: String,
  pub query: Vec<(String, String)>,
  pub headers: Vec<(String, String)>,
  pub body: Body,
}

impl Request {
  pub fn new(method: Method, path: impl Into<String>) -> Self {
    Self {
      method,
      path: path.into(),
      query: Vec::new(),
      headers: Vec::new(),
      body: Body::Empty,
    }
  }

  pub fn get(path: impl Into<String>) -> Self {
    Self::new(Method::Get, path)
  }

  pub fn post(path: impl Into<String>) -> Self {
    Self::new(Method::Post, path)
  }

  pub fn put(path: impl Into<String>) -> Self {
    Self::new(Method::Put, path)
  }

  pub fn patch(path: impl Into<String>) -> Self {
    Self::new(Method::Patch, path)
  }

  pub fn delete(path: impl Into<String>) -> Self {
    Self::new(Method::Delete, path)
  }

  pub fn query(mut self, params: Vec<(String, String)>) -> Self {
    self.query = params;
    self
  }

  pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.headers.push((name.into(), value.into()));
    self
  }

  pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
    self.body = Body::Json(serde_json::to_value(body)?);
    Ok(self)
  }

  pub fn bytes(mut self, content_type: impl Into<String>, data: Vec<u8>) -> Self {
    self.body = Body::Bytes {
      content_type: content_type.into(),
      data,
    };
    self
  }
}

/// A successful (2xx) response
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
  pub status: u16,
  pub body: Vec<u8>,
}

impl Response {
  pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
    Self {
      status,
      body: body.into(),
    }
  }

  /// Decode the body as JSON. An empty body decodes as `null`.
  pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
    if self.body.iter().all(u8::is_ascii_whitespace) {
      return Ok(serde_json::from_value(serde_json::Value::Null)?);
    }
    Ok(serde_json::from_slice(&self.body)?)
  }
}

/// Capability to send one request and receive its response.
///
/// Implementations translate non-2xx responses into [`Error::Api`] carrying the
/// status code and the raw error payload.
#[async_trait]
pub trait Transport: Send + Sync {
  async fn send(&self, request: Request) -> Result<Response>;
}

/// reqwest-backed transport
pub struct HttpTransport {
  http: reqwest::Client,
  base_url: String,
  api_key: String,
}

impl HttpTransport {
  pub fn new(config: &ClientConfig) -> Result<Self> {
    let http = reqwest::Client::builder()
      .timeout(config.timeout)
      .user_agent(config.user_agent.clone())
      .build()
      .map_err(|e| Error::config(format!("failed to build HTTP client: {}", e)))?;

    Ok(Self {
      http,
      base_url: config.api_url(),
      api_key: config.api_key.clone(),
    })
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }
}

#[async_trait]
impl Transport for HttpTransport {
  async fn send(&self, request: Request) -> Result<Response> {
    let url = format!("{}{}", self.base_url, request.path);
    tracing::debug!(method = %request.method, %url, "sending request");

    let mut builder = self
      .http
      .request(request.method.into(), &url)
      .bearer_auth(&self.api_key);

    if !request.query.is_empty() {
      builder = builder.query(&request.query);
    }
    for (name, value) in &request.headers {
      builder = builder.header(name.as_str(), value.as_str());
    }
    builder = match request.body {
      Body::Empty => builder,
      Body::Json(value) => builder.json(&value),
      Body::Bytes { content_type, data } => builder
        .header(reqwest::header::CONTENT_TYPE, content_type)
        .body(data),
    };

    let response = builder.send().await?;
    let status = response.status().as_u16();
    let body = response.bytes().await?.to_vec();

    if !(200..300).contains(&status) {
      tracing::warn!(method = %request.method, %url, status, "request failed");
      return Err(Error::from_response(status, &body));
    }

    Ok(Response { status, body })
  }
}

/// Percent-encode a single path segment.
pub(crate) fn segment(value: &str) -> String {
  urlencoding::encode(value).into_owned()
}

/// Percent-encode a slash-separated object key, keeping the slashes.
pub(crate) fn key_path(key: &str) -> String {
  key
    .trim_start_matches('/')
    .split('/')
    .map(segment)
    .collect::<Vec<_>>()
    .join("/")
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_method_display() {
    assert_eq!(Method::Get.to_string(), "GET");
    assert_eq!(Method::Patch.to_string(), "PATCH");
    assert_eq!(Method::Delete.to_string(), "DELETE");
  }

  #[test]
  fn test_request_builder() {
    let req = Request::post("/users")
      .header("X-Trace", "abc")
      .json(&json!({"name": "Alice"}))
      .unwrap();

    assert_eq!(req.method, Method::Post);
    assert_eq!(req.path, "/users");
    assert_eq!(req.headers, vec![("X-Trace".to_string(), "abc".to_string())]);
    assert_eq!(req.body, Body::Json(json!({"name": "Alice"})));
  }

  #[test]
  fn test_response_json() {
    let resp = Response::new(200, r#"{"id": 7}"#);
    let value: serde_json::Value = resp.json().unwrap();
    assert_eq!(value["id"], 7);
  }

  #[test]
  fn test_response_empty_body_is_null() {
    let resp = Response::new(204, Vec::new());
    let value: Option<serde_json::Value> = resp.json().unwrap();
    assert!(value.is_none());
  }

  #[test]
  fn test_response_invalid_json() {
    let resp = Response::new(200, "not json");
    let err = resp.json::<serde_json::Value>().unwrap_err();
    assert!(matches!(err, Error::Serialization(_)));
  }

  #[test]
  fn test_segment_encoding() {
    assert_eq!(segment("users"), "users");
    assert_eq!(segment("my table"), "my%20table");
    assert_eq!(segment("a/b"), "a%2Fb");
  }

  #[test]
  fn test_key_path_keeps_slashes() {
    assert_eq!(key_path("/avatars/user 1.png"), "avatars/user%201.png");
  }

  #[test]
  fn test_http_transport_base_url() {
    let config = ClientConfig::builder("myproject", "key").build().unwrap();
    let transport = HttpTransport::new(&config).unwrap();
    assert_eq!(transport.base_url(), "https://myproject.wowsql.com/api/v2");
  }
}
