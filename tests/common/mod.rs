//! Shared test helpers: a transport that records requests and replays canned responses.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use wowsql::{Error, Request, Response, Result, Transport, WowSQL};

#[derive(Default)]
pub struct MockTransport {
  requests: Mutex<Vec<Request>>,
  responses: Mutex<VecDeque<Result<Response>>>,
}

impl MockTransport {
  pub fn new() -> Arc<Self> {
    Arc::new(Self::default())
  }

  /// Queue a 200 response with a JSON body
  pub fn push_json(&self, body: Value) {
    self.push(Ok(Response::new(200, body.to_string())));
  }

  pub fn push_bytes(&self, body: &[u8]) {
    self.push(Ok(Response::new(200, body.to_vec())));
  }

  /// Queue an API error as a transport would produce it
  pub fn push_error(&self, status: u16, body: Value) {
    let message = body["detail"].as_str().unwrap_or("error").to_string();
    self.push(Err(Error::Api {
      status,
      message,
      body,
    }));
  }

  pub fn push(&self, response: Result<Response>) {
    self.responses.lock().unwrap().push_back(response);
  }

  pub fn requests(&self) -> Vec<Request> {
    self.requests.lock().unwrap().clone()
  }

  pub fn last_request(&self) -> Request {
    self.requests().pop().expect("no request was sent")
  }
}

#[async_trait]
impl Transport for MockTransport {
  async fn send(&self, request: Request) -> Result<Response> {
    self.requests.lock().unwrap().push(request);
    self
      .responses
      .lock()
      .unwrap()
      .pop_front()
      .unwrap_or_else(|| Ok(Response::new(200, empty_page().to_string())))
  }
}

pub fn empty_page() -> Value {
  json!({"data": [], "count": 0, "total": 0, "limit": 0, "offset": 0})
}

pub fn page(rows: Vec<Value>, total: u64) -> Value {
  let count = rows.len();
  json!({
    "data": rows,
    "count": count,
    "total": total,
    "limit": count,
    "offset": 0
  })
}

/// Client wired to a fresh mock transport
pub fn client() -> (WowSQL, Arc<MockTransport>) {
  let mock = MockTransport::new();
  (WowSQL::with_transport(mock.clone()), mock)
}

/// Look up a query parameter on a recorded request
pub fn param<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
  request
    .query
    .iter()
    .find(|(k, _)| k == name)
    .map(|(_, v)| v.as_str())
}
