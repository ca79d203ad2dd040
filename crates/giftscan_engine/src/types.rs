use std::fmt;

use giftscan_core::{ExtractedRecord, FailureCategory, Identifier};

/// Emitted once for every identifier the scan engine settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEvent {
    pub identifier: Identifier,
    pub result: Result<ExtractedRecord, FailureKind>,
}

impl ScanEvent {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
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
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Decode,
    Network,
    Parse,
    Panicked,
    /// The unit's task was aborted before it produced a result.
    Cancelled,
}

impl FailureKind {
    /// Collapses the detailed kind into the two classes the aggregate tallies.
    pub fn category(&self) -> FailureCategory {
        match self {
            FailureKind::Parse => FailureCategory::Parse,
            _ => FailureCategory::Fetch,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decode => write!(f, "undecodable body"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Parse => write!(f, "parse error"),
            FailureKind::Panicked => write!(f, "fetcher panicked"),
            FailureKind::Cancelled => write!(f, "scan unit aborted"),
        }
    }
}
