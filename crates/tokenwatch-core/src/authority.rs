use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::expiry::Classification;

// ---------------------------------------------------------------------------
// TokenLookup
// ---------------------------------------------------------------------------

/// Successful lookup result for one accessor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenLookup {
    pub policies: Vec<String>,
    /// Absent for tokens that never expire (root-like tokens).
    pub expire_time: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// AuthorityError
// ---------------------------------------------------------------------------

/// Closed set of failure kinds produced at the authority-call boundary.
/// Every call site handles exactly these three outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorityErrorKind {
    /// The caller lacks rights for the operation (HTTP 403).
    PermissionDenied,
    /// Malformed or unknown accessor (HTTP 400/404).
    InvalidRequest,
    /// Transport failure, timeout, or unexpected response shape.
    Other,
}

#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct AuthorityError {
    pub kind: AuthorityErrorKind,
    pub message: String,
}

impl AuthorityError {
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self {
            kind: AuthorityErrorKind::PermissionDenied,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: AuthorityErrorKind::InvalidRequest,
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self {
            kind: AuthorityErrorKind::Other,
            message: message.into(),
        }
    }

    /// Fold a lookup failure into the status classification for its entry.
    pub fn into_classification(self) -> Classification {
        match self.kind {
            AuthorityErrorKind::PermissionDenied => Classification::PermissionDenied,
            AuthorityErrorKind::InvalidRequest => Classification::InvalidAccessor,
            AuthorityErrorKind::Other => Classification::AuthorityError {
                detail: self.message,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// CredentialAuthority
// ---------------------------------------------------------------------------

/// Contract with the external credential authority.
///
/// Implementations issue stateless request/response calls and must be safe
/// for concurrent use; the aggregator shares one handle across lookup
/// workers. Every call must be bounded by a timeout and surface expiry as
/// `AuthorityErrorKind::Other`.
pub trait CredentialAuthority: Send + Sync {
    fn lookup_accessor(&self, accessor: &str) -> Result<TokenLookup, AuthorityError>;

    fn renew_accessor(
        &self,
        accessor: &str,
        increment: Duration,
    ) -> Result<(), AuthorityError>;

    fn revoke_accessor(&self, accessor: &str) -> Result<(), AuthorityError>;
}
