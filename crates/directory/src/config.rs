//! Client configuration for the directory service.

use std::fmt;

/// Connection settings shared by every request in a session.
///
/// Built once from the base URL and an API token, then passed around by
/// reference. The token is stored as a ready-to-send header value and is
/// kept out of `Debug` output.
#[derive(Clone)]
pub struct ClientConfig {
    base_url: String,
    authorization: String,
}

impl ClientConfig {
    /// Build a config for the service at `base_url` authenticating with
    /// `api_token` as a bearer token.
    ///
    /// Request paths are appended to `base_url` verbatim, so it should not
    /// end with a slash.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_token: &str) -> Self {
        Self {
            base_url: base_url.into(),
            authorization: format!("Bearer {api_token}"),
        }
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Header name/value pairs attached to every request.
    #[must_use]
    pub fn headers(&self) -> [(&'static str, &str); 2] {
        [
            ("Content-Type", "application/json"),
            ("Authorization", &self.authorization),
        ]
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // the authorization value is a credential; keep it out of logs
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("authorization", &"Bearer <redacted>")
            .finish()
    }
}
