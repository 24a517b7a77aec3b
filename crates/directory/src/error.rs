//! Error types for directory API operations.
//!
//! Every failure is classified into a category so callers can decide what
//! feedback to give and whether retrying is worthwhile.

use reconcile::Interrupt;

/// Result type alias for directory operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of directory errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Connectivity failures (transient, retryable).
    Network,
    /// The server answered outside the expected protocol.
    Contract,
    /// Request or response bytes did not match the wire shapes.
    Format,
    /// A lookup did not resolve to exactly one group.
    Ambiguous,
    /// The caller stopped the operation.
    Interrupted,
}

impl ErrorCategory {
    /// Whether this error category is typically transient and worth retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network)
    }

    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "Network connectivity issue",
            Self::Contract => "Unexpected server response",
            Self::Format => "Malformed request or response payload",
            Self::Ambiguous => "Ambiguous or missing group",
            Self::Interrupted => "Operation interrupted",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Network => "Check connectivity to the directory service and try again",
            Self::Contract => "Confirm the base URL points at the directory REST API",
            Self::Format => "The service may be running an incompatible API version",
            Self::Ambiguous => "Verify the group exists and its identifier is unique",
            Self::Interrupted => "Re-run the command, or raise the timeout",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur while talking to the directory service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Connection, send or read failure below the HTTP contract.
    #[error("transport error: {message}")]
    Transport {
        /// Underlying failure description.
        message: String,
    },

    /// The response status line did not match the required one.
    #[error("unexpected status: got {observed:?}, want {expected:?}")]
    StatusMismatch {
        /// Status line the server actually returned.
        observed: String,
        /// Status line the caller required.
        expected: String,
    },

    /// The response body could not be decoded as the expected JSON shape.
    #[error("could not decode response: {message}")]
    Decode {
        /// Underlying decode failure.
        message: String,
    },

    /// An outgoing request body could not be serialized.
    #[error("could not encode request: {message}")]
    Serialize {
        /// Underlying encode failure.
        message: String,
    },

    /// A search did not resolve to exactly one record.
    #[error("search matched {count} groups, expected exactly one")]
    Cardinality {
        /// Number of records the search returned.
        count: usize,
    },

    /// An update was applied remotely but the verification read failed.
    ///
    /// The write phase succeeded; only the follow-up lookup is in doubt.
    #[error("change applied but verification read failed")]
    ReadBack {
        /// Failure from the verification read.
        #[source]
        source: Box<Error>,
    },

    /// The call context was cancelled or its deadline passed.
    #[error(transparent)]
    Interrupted(#[from] Interrupt),
}

impl Error {
    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a decode error from a serde failure.
    pub(crate) fn decode(err: serde_json::Error) -> Self {
        Self::Decode {
            message: err.to_string(),
        }
    }

    /// Create a serialize error from a serde failure.
    pub(crate) fn serialize(err: serde_json::Error) -> Self {
        Self::Serialize {
            message: err.to_string(),
        }
    }

    /// Wrap a verification-read failure after a successful write.
    pub(crate) fn read_back(source: Error) -> Self {
        Self::ReadBack {
            source: Box::new(source),
        }
    }

    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Transport { .. } => ErrorCategory::Network,
            Error::StatusMismatch { .. } => ErrorCategory::Contract,
            Error::Decode { .. } | Error::Serialize { .. } => ErrorCategory::Format,
            Error::Cardinality { .. } => ErrorCategory::Ambiguous,
            Error::ReadBack { source } => source.category(),
            Error::Interrupted(_) => ErrorCategory::Interrupted,
        }
    }

    /// Whether this error is typically transient and worth retrying.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::Transport {
                message: format!("HTTP status {code}"),
            },
            other => Self::Transport {
                message: other.to_string(),
            },
        }
    }
}
