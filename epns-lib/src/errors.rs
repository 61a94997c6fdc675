//! Error types for EPNS operations.
//!
//! Every SDK operation reports failure through [`EpnsError`]. Reads return it
//! directly; opt-in and opt-out fold it into an
//! [`ActionOutcome`](crate::channels::ActionOutcome).

/// Error codes for FFI and mobile integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum EpnsErrorCode {
    /// Transport/network layer error
    Transport = 2000,
    /// Connection failed
    ConnectionFailed = 2001,
    /// Connection timeout
    ConnectionTimeout = 2002,
    /// Backend answered with a non-success status
    Http = 2003,
    /// Serialization error
    Serialization = 5002,
    /// Signer capability failed
    Signer = 6000,
    /// Invalid client configuration
    InvalidConfig = 7000,
    /// Internal/unexpected error
    Internal = 9999,
}

/// Error type for EPNS operations.
#[derive(Debug, thiserror::Error)]
pub enum EpnsError {
    /// Transport/network layer error.
    #[error("transport error: {0}")]
    Transport(String),

    /// Connection failed.
    #[error("connection to {target} failed: {reason}")]
    ConnectionFailed {
        /// Target URL
        target: String,
        /// Underlying error message
        reason: String,
    },

    /// Connection timeout.
    #[error("{operation} timed out after {timeout_ms}ms")]
    ConnectionTimeout {
        /// Operation that timed out
        operation: String,
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// The backend returned a non-2xx status.
    #[error("backend returned HTTP {status}: {body}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The external signer failed to produce a signature.
    #[error("signer error: {0}")]
    Signer(String),

    /// Client configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Internal/unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl EpnsError {
    /// Get the error code for FFI/mobile integration.
    pub fn code(&self) -> EpnsErrorCode {
        match self {
            Self::Transport(_) => EpnsErrorCode::Transport,
            Self::ConnectionFailed { .. } => EpnsErrorCode::ConnectionFailed,
            Self::ConnectionTimeout { .. } => EpnsErrorCode::ConnectionTimeout,
            Self::Http { .. } => EpnsErrorCode::Http,
            Self::Serialization(_) => EpnsErrorCode::Serialization,
            Self::Signer(_) => EpnsErrorCode::Signer,
            Self::InvalidConfig(_) => EpnsErrorCode::InvalidConfig,
            Self::Internal(_) => EpnsErrorCode::Internal,
        }
    }

    /// Get the error message as an owned String (useful for FFI).
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Returns true if retrying the same call could succeed.
    ///
    /// The SDK never retries on its own; this is a hint for callers.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::ConnectionFailed { .. } | Self::ConnectionTimeout { .. } => {
                true
            }
            Self::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Create a signer error from any displayable error.
    pub fn signer(err: impl std::fmt::Display) -> Self {
        Self::Signer(err.to_string())
    }

    /// Map a reqwest error onto the transport variants.
    pub(crate) fn from_reqwest(err: reqwest::Error, target: &str, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::ConnectionTimeout {
                operation: format!("POST {target}"),
                timeout_ms: secs_to_ms(timeout_secs),
            }
        } else if err.is_connect() {
            Self::ConnectionFailed {
                target: target.to_string(),
                reason: err.to_string(),
            }
        } else if err.is_decode() {
            Self::Serialization(format!("failed to decode EPNS response: {err}"))
        } else {
            Self::Transport(err.to_string())
        }
    }
}

fn secs_to_ms(secs: u64) -> u64 {
    secs.saturating_mul(1000)
}

impl From<serde_json::Error> for EpnsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = EpnsError::Http {
            status: 503,
            body: "unavailable".into(),
        };
        assert_eq!(err.code(), EpnsErrorCode::Http);
        assert!(err.is_retryable());

        let err = EpnsError::Http {
            status: 400,
            body: String::new(),
        };
        assert!(!err.is_retryable());

        assert_eq!(EpnsError::signer("rejected").code(), EpnsErrorCode::Signer);
        assert!(!EpnsError::signer("rejected").is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = EpnsError::signer("user rejected request");
        assert_eq!(err.to_string(), "signer error: user rejected request");

        let err = EpnsError::ConnectionTimeout {
            operation: "POST /channels/search".into(),
            timeout_ms: 30_000,
        };
        assert!(err.to_string().contains("30000ms"));
    }

    #[test]
    fn test_timeout_ms_saturates() {
        assert_eq!(secs_to_ms(30), 30_000);
        assert_eq!(secs_to_ms(u64::MAX), u64::MAX);
    }

    #[test]
    fn test_from_serde_json() {
        let err: EpnsError = serde_json::from_str::<u8>("nope").unwrap_err().into();
        assert_eq!(err.code(), EpnsErrorCode::Serialization);
    }
}
