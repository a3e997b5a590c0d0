//! Error types for remote store operations.

use thiserror::Error;

/// Result type for remote store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by `PlaylistStore` and `VideoSource` implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The call to the remote system failed at the transport level.
    #[error("transport failure: {message}")]
    Transport {
        /// Description of the failure.
        message: String,
        /// Underlying error, if available.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The addressed object does not exist on the remote system.
    #[error("not found: {message}")]
    NotFound {
        /// Description of the missing object.
        message: String,
    },

    /// The remote system is throttling calls.
    #[error("rate limited: {message}")]
    RateLimited {
        /// Description supplied by the remote system.
        message: String,
        /// Suggested wait before retrying, in seconds.
        retry_after_secs: Option<u64>,
    },

    /// The quota pool cannot cover the call.
    #[error("quota exhausted: {required} units required, {remaining} remaining")]
    QuotaExhausted {
        /// Units the call would have cost.
        required: u64,
        /// Units left in the pool.
        remaining: u64,
    },

    /// The remote system answered with something the caller cannot use.
    #[error("invalid response: {message}")]
    InvalidResponse {
        /// Description of what was wrong with the response.
        message: String,
    },
}

impl StoreError {
    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a transport error with an underlying source.
    pub fn transport_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates a rate-limited error.
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
            retry_after_secs: None,
        }
    }

    /// Creates a quota-exhausted error.
    pub fn quota_exhausted(required: u64, remaining: u64) -> Self {
        Self::QuotaExhausted {
            required,
            remaining,
        }
    }

    /// Creates an invalid-response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Returns true if the error is transient and the call may be retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::RateLimited { .. })
    }

    /// Returns true if the error is permanent and retrying cannot help.
    pub fn is_permanent(&self) -> bool {
        !self.is_transient()
    }

    /// Returns a stable code identifying the error kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "TRANSPORT_FAILURE",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::QuotaExhausted { .. } => "QUOTA_EXHAUSTED",
            Self::InvalidResponse { .. } => "INVALID_RESPONSE",
        }
    }
}
