//! Scripted in-memory transport
//!
//! Responses are queued per `METHOD path` and consumed in order. Every call
//! is recorded so tests can assert on what reached the "server". A request
//! with nothing queued fails with [`ClientError::Transport`].

use crate::error::{ClientError, Result};
use crate::transport::Transport;
use async_trait::async_trait;
use reqwest::Method;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// A request observed by [`MockTransport`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

enum Scripted {
    Ok(Vec<u8>),
    Status(u16, String),
}

#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: Mutex<Vec<RecordedCall>>,
    forbidden: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport that fails every request; used to prove a code path is offline.
    pub fn forbidden() -> Self {
        Self {
            forbidden: true,
            ..Self::default()
        }
    }

    fn key(method: &Method, path: &str) -> String {
        format!("{} {}", method, path)
    }

    fn push(&self, method: Method, path: &str, response: Scripted) {
        self.responses
            .lock()
            .unwrap()
            .entry(Self::key(&method, path))
            .or_default()
            .push_back(response);
    }

    /// Queue a 200 response with a JSON body
    pub fn respond(&self, method: Method, path: &str, body: serde_json::Value) -> &Self {
        self.push(method, path, Scripted::Ok(body.to_string().into_bytes()));
        self
    }

    /// Queue a 2xx response with an empty body
    pub fn respond_empty(&self, method: Method, path: &str) -> &Self {
        self.push(method, path, Scripted::Ok(Vec::new()));
        self
    }

    /// Queue a non-2xx response
    pub fn respond_status(&self, method: Method, path: &str, status: u16, body: &str) -> &Self {
        self.push(method, path, Scripted::Status(status, body.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Calls matching a method and path, in order
    pub fn calls_to(&self, method: Method, path: &str) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.method == method && c.path == path)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<Vec<u8>> {
        self.calls.lock().unwrap().push(RecordedCall {
            method: method.clone(),
            path: path.to_string(),
            body,
        });

        if self.forbidden {
            return Err(ClientError::Transport(format!(
                "unexpected request {} {}",
                method, path
            )));
        }

        let next = self
            .responses
            .lock()
            .unwrap()
            .get_mut(&Self::key(&method, path))
            .and_then(|queue| queue.pop_front());

        match next {
            Some(Scripted::Ok(bytes)) => Ok(bytes),
            Some(Scripted::Status(status, body)) => Err(ClientError::Api { status, body }),
            None => Err(ClientError::Transport(format!(
                "no scripted response for {} {}",
                method, path
            ))),
        }
    }
}
