//! Transport seam for the directory API.
//!
//! This module provides the [`Transport`] trait and its implementations.
//! The primary implementation is [`http::HttpTransport`], which dispatches
//! requests over a blocking [`ureq`] agent.
//!
//! # Testing
//!
//! Use [`MockTransport`] for testing without network access:
//!
//! ```
//! use directory::transport::{MockTransport, Transport, STATUS_OK};
//! use reconcile::CallContext;
//!
//! let mut mock = MockTransport::new();
//! mock.enqueue("/groups/search", STATUS_OK, br#"[{"name":"ops","id":"7"}]"#);
//!
//! let ctx = CallContext::background();
//! let body = mock.post(&ctx, "/groups/search", b"{}", STATUS_OK).unwrap();
//! assert!(body.starts_with(b"["));
//! ```

pub mod http;

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use reconcile::CallContext;

use crate::error::{Error, Result};

pub use http::HttpTransport;

/// Status line of a successful body-bearing response.
pub const STATUS_OK: &str = "200 OK";

/// Status line of a successful empty response.
pub const STATUS_NO_CONTENT: &str = "204 No Content";

/// Blocking request dispatch against the directory service.
///
/// The protocol is POST-only; endpoint and intent are carried entirely by
/// the request path. Implementations enforce the status contract: the
/// response status line must equal `expected_status` verbatim, down to the
/// reason phrase. No retries happen at this level.
pub trait Transport: Send + Sync {
    /// POST `body` to `path` (relative to the configured base URL) and
    /// return the raw response body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StatusMismatch`] when the response status line
    /// differs from `expected_status`, [`Error::Interrupted`] when `ctx`
    /// is cancelled or past its deadline, and [`Error::Transport`] for
    /// connection-level failures.
    fn post(
        &self,
        ctx: &CallContext,
        path: &str,
        body: &[u8],
        expected_status: &str,
    ) -> Result<Vec<u8>>;
}

/// One request observed by [`MockTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// Request path, relative to the base URL.
    pub path: String,
    /// Raw request body.
    pub body: Vec<u8>,
    /// Status line the caller required.
    pub expected_status: String,
}

#[derive(Debug, Clone)]
struct ScriptedResponse {
    status: String,
    body: Vec<u8>,
}

/// Mock transport for testing without network access.
///
/// Responses are scripted per path and consumed first in, first out.
/// Every dispatched request is recorded. Clones share the same script
/// and request log.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<HashMap<String, VecDeque<ScriptedResponse>>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockTransport {
    /// Create a new mock with no scripted responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `path`.
    pub fn enqueue(&mut self, path: &str, status: &str, body: &[u8]) {
        let mut responses = self.responses.lock().unwrap();
        responses
            .entry(path.to_string())
            .or_default()
            .push_back(ScriptedResponse {
                status: status.to_string(),
                body: body.to_vec(),
            });
    }

    /// All requests dispatched so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Paths of all requests dispatched so far, in order.
    #[must_use]
    pub fn request_paths(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|request| request.path.clone())
            .collect()
    }
}

impl Transport for MockTransport {
    fn post(
        &self,
        ctx: &CallContext,
        path: &str,
        body: &[u8],
        expected_status: &str,
    ) -> Result<Vec<u8>> {
        // mirror the real transport: an interrupted call never dispatches
        ctx.check()?;

        self.requests.lock().unwrap().push(RecordedRequest {
            path: path.to_string(),
            body: body.to_vec(),
            expected_status: expected_status.to_string(),
        });

        let scripted = {
            let mut responses = self.responses.lock().unwrap();
            responses
                .get_mut(path)
                .and_then(VecDeque::pop_front)
                .ok_or_else(|| Error::transport(format!("no scripted response for {path}")))?
        };

        if scripted.status != expected_status {
            return Err(Error::StatusMismatch {
                observed: scripted.status,
                expected: expected_status.to_string(),
            });
        }
        Ok(scripted.body)
    }
}
