//! HTTP transport over a blocking ureq agent.
//!
//! One agent is shared by all requests of a session, so connections are
//! reused across lifecycle operations against the same service.

use reconcile::CallContext;
use ureq::http::StatusCode;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::transport::Transport;

/// Maximum response body size (group payloads are tiny; this is a guard).
const MAX_BODY_SIZE: u64 = 10 * 1024 * 1024;

/// Transport dispatching over HTTP with [`ureq`].
///
/// Non-success statuses are treated as ordinary responses, not transport
/// errors: the status contract is checked here, against the exact status
/// line the caller expects.
pub struct HttpTransport {
    /// HTTP agent for requests.
    agent: ureq::Agent,
    /// Connection settings, including auth headers.
    config: ClientConfig,
}

impl HttpTransport {
    /// Create a transport for the given client configuration.
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        let agent_config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build();
        Self {
            agent: ureq::Agent::new_with_config(agent_config),
            config,
        }
    }

    /// Build the absolute URL for a request path.
    fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url(), path)
    }
}

/// Render a status line the way the expected-status contract spells it,
/// e.g. `200 OK` or `204 No Content`.
fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    }
}

/// Map a mid-request failure: when the context ran out while the request
/// was in flight, the interrupt is the real cause.
fn interrupt_or(ctx: &CallContext, fallback: Error) -> Error {
    match ctx.interrupted() {
        Some(interrupt) => Error::Interrupted(interrupt),
        None => fallback,
    }
}

impl Transport for HttpTransport {
    fn post(
        &self,
        ctx: &CallContext,
        path: &str,
        body: &[u8],
        expected_status: &str,
    ) -> Result<Vec<u8>> {
        ctx.check()?;

        let url = self.endpoint_url(path);
        log::debug!("POST {url} ({} byte body)", body.len());

        let mut request = self.agent.post(&url);
        for (name, value) in self.config.headers() {
            request = request.header(name, value);
        }
        if let Some(remaining) = ctx.remaining() {
            request = request.config().timeout_global(Some(remaining)).build();
        }

        let mut response = request
            .send(body)
            .map_err(|err| interrupt_or(ctx, Error::from(err)))?;

        let observed = status_line(response.status());
        let bytes = response
            .body_mut()
            .with_config()
            .limit(MAX_BODY_SIZE)
            .read_to_vec()
            .map_err(|err| {
                interrupt_or(ctx, Error::transport(format!("could not read body: {err}")))
            })?;

        log::trace!(
            "{url} answered {observed}: {}",
            String::from_utf8_lossy(&bytes)
        );

        if observed != expected_status {
            return Err(Error::StatusMismatch {
                observed,
                expected: expected_status.to_string(),
            });
        }
        Ok(bytes)
    }
}
