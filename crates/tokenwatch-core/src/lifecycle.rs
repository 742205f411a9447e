use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::authority::{AuthorityError, AuthorityErrorKind, CredentialAuthority};

// ---------------------------------------------------------------------------
// LifecycleAction / FailureKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleAction {
    Renew,
    Revoke,
}

impl LifecycleAction {
    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleAction::Renew => "renew",
            LifecycleAction::Revoke => "revoke",
        }
    }
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No accessor supplied; the authority was not contacted.
    MissingInput,
    PermissionDenied,
    InvalidAccessor,
    AuthorityError,
}

// ---------------------------------------------------------------------------
// ActionOutcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ActionResult {
    Success,
    Failure { kind: FailureKind, detail: String },
}

/// Transient result of one lifecycle action; never stored. Callers rebuild
/// the inventory report to observe the effect.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionOutcome {
    pub accessor: String,
    pub action: LifecycleAction,
    #[serde(flatten)]
    pub result: ActionResult,
}

impl ActionOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self.result, ActionResult::Success)
    }

    fn failure(
        accessor: &str,
        action: LifecycleAction,
        kind: FailureKind,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            accessor: accessor.to_string(),
            action,
            result: ActionResult::Failure {
                kind,
                detail: detail.into(),
            },
        }
    }

    fn from_authority(
        accessor: &str,
        action: LifecycleAction,
        result: Result<(), AuthorityError>,
    ) -> Self {
        match result {
            Ok(()) => Self {
                accessor: accessor.to_string(),
                action,
                result: ActionResult::Success,
            },
            Err(err) => {
                let kind = match err.kind {
                    AuthorityErrorKind::PermissionDenied => FailureKind::PermissionDenied,
                    AuthorityErrorKind::InvalidRequest => FailureKind::InvalidAccessor,
                    AuthorityErrorKind::Other => FailureKind::AuthorityError,
                };
                Self::failure(accessor, action, kind, err.message)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// renew / revoke
// ---------------------------------------------------------------------------

/// Extend a token's validity by the configured increment. Single-shot and
/// safe to repeat; it affects only the authority's record for this accessor.
pub fn renew(
    accessor: &str,
    authority: &dyn CredentialAuthority,
    increment: Duration,
) -> ActionOutcome {
    let accessor = accessor.trim();
    if accessor.is_empty() {
        return ActionOutcome::failure(
            accessor,
            LifecycleAction::Renew,
            FailureKind::MissingInput,
            "no accessor provided",
        );
    }
    ActionOutcome::from_authority(
        accessor,
        LifecycleAction::Renew,
        authority.renew_accessor(accessor, increment),
    )
}

/// Revoke the token behind an accessor. Revoking an already-revoked or
/// unknown accessor surfaces as `InvalidAccessor`, not a fault.
pub fn revoke(accessor: &str, authority: &dyn CredentialAuthority) -> ActionOutcome {
    let accessor = accessor.trim();
    if accessor.is_empty() {
        return ActionOutcome::failure(
            accessor,
            LifecycleAction::Revoke,
            FailureKind::MissingInput,
            "no accessor provided",
        );
    }
    ActionOutcome::from_authority(
        accessor,
        LifecycleAction::Revoke,
        authority.revoke_accessor(accessor),
    )
}

/// One operator-facing message per outcome, shared by every surface so the
/// same failure always reads the same way.
pub fn operator_message(outcome: &ActionOutcome) -> String {
    match &outcome.result {
        ActionResult::Success => match outcome.action {
            LifecycleAction::Renew => format!("Renewed token {}", outcome.accessor),
            LifecycleAction::Revoke => format!("Revoked token {}", outcome.accessor),
        },
        ActionResult::Failure { kind, detail } => match kind {
            FailureKind::MissingInput => {
                format!("Cannot {}: no accessor provided", outcome.action)
            }
            FailureKind::PermissionDenied => format!(
                "Permission denied: not allowed to {} {}",
                outcome.action, outcome.accessor
            ),
            FailureKind::InvalidAccessor => format!(
                "Invalid accessor {}: the authority has no record of it",
                outcome.accessor
            ),
            FailureKind::AuthorityError => format!(
                "Authority error while trying to {} {}: {}",
                outcome.action, outcome.accessor, detail
            ),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
