use std::fmt;

use scout_core::TaskFailure;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub original_url: String,
    pub final_url: String,
    pub status: u16,
    pub redirect_count: usize,
    pub content_type: Option<String>,
    pub byte_len: u64,
    /// Requests sent, including retries.
    pub attempts: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Cancelled,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Cancelled => write!(f, "cancelled"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

impl From<FetchError> for TaskFailure {
    fn from(err: FetchError) -> Self {
        match err.kind {
            FailureKind::InvalidUrl => TaskFailure::InvalidUrl {
                message: err.message,
            },
            FailureKind::HttpStatus(code) => TaskFailure::HttpStatus { code },
            FailureKind::Network => TaskFailure::Network {
                message: err.message,
            },
            _ => TaskFailure::Network {
                message: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn network_failure_reads_once() {
        let failure = TaskFailure::from(FetchError::new(FailureKind::Network, "connection refused"));
        assert_eq!(failure.to_string(), "network error: connection refused");
    }

    #[test]
    fn other_transport_failures_keep_their_kind() {
        let failure = TaskFailure::from(FetchError::new(FailureKind::Timeout, "after 30s"));
        assert_eq!(failure.to_string(), "network error: timeout: after 30s");

        let failure = TaskFailure::from(FetchError::new(FailureKind::HttpStatus(503), "busy"));
        assert_eq!(failure, TaskFailure::HttpStatus { code: 503 });
    }
}
