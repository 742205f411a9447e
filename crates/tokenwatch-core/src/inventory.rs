use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::authority::CredentialAuthority;
use crate::expiry::{classify, Classification};
use crate::tracked::TrackedToken;

/// Accessor column value for entries whose input carried no accessor.
pub const MISSING_ACCESSOR_DISPLAY: &str = "N/A";

// ---------------------------------------------------------------------------
// TokenStatus
// ---------------------------------------------------------------------------

/// Resolved state of one tracked token, immutable once built. Exactly one
/// is produced per input entry regardless of lookup outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenStatus {
    pub name: String,
    pub accessor: String,
    pub policies: Vec<String>,
    pub expiry: Classification,
    pub raw_expiry_time: Option<DateTime<Utc>>,
}

impl TokenStatus {
    pub fn is_expiring_soon(&self) -> bool {
        self.expiry.is_expiring_soon()
    }

    /// Absolute expiry for display alongside the relative one.
    pub fn absolute_expiry(&self) -> String {
        match self.raw_expiry_time {
            Some(t) => t.format("%Y-%m-%d %H:%M UTC").to_string(),
            None => MISSING_ACCESSOR_DISPLAY.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Resolve one tracked token against the authority.
///
/// An entry without an accessor short-circuits locally; the authority is
/// never contacted for it. Lookup failures fold into the classification,
/// never past this boundary.
pub fn resolve(
    token: &TrackedToken,
    now: DateTime<Utc>,
    authority: &dyn CredentialAuthority,
) -> TokenStatus {
    let name = token.display_name().to_string();
    let Some(accessor) = token.accessor() else {
        return TokenStatus {
            name,
            accessor: MISSING_ACCESSOR_DISPLAY.to_string(),
            policies: Vec::new(),
            expiry: Classification::MissingAccessor,
            raw_expiry_time: None,
        };
    };

    match authority.lookup_accessor(accessor) {
        Ok(lookup) => TokenStatus {
            name,
            accessor: accessor.to_string(),
            policies: lookup.policies,
            expiry: classify(lookup.expire_time, now),
            raw_expiry_time: lookup.expire_time,
        },
        Err(err) => TokenStatus {
            name,
            accessor: accessor.to_string(),
            policies: Vec::new(),
            expiry: err.into_classification(),
            raw_expiry_time: None,
        },
    }
}

// ---------------------------------------------------------------------------
// InventoryReport
// ---------------------------------------------------------------------------

/// Ordered report over the tracked-token list: one status per input entry,
/// in input order, all classified against the same `generated_at` instant.
#[derive(Debug, Clone, Serialize)]
pub struct InventoryReport {
    pub generated_at: DateTime<Utc>,
    pub statuses: Vec<TokenStatus>,
    /// Set when the tracked-token source could not be read; the report then
    /// carries zero entries and this message is surfaced to the operator.
    pub source_error: Option<String>,
}

impl InventoryReport {
    pub fn source_failure(message: String) -> Self {
        Self {
            generated_at: Utc::now(),
            statuses: Vec::new(),
            source_error: Some(message),
        }
    }
}

/// Build the displayable report. Lookups run concurrently when
/// `parallelism > 1`, bounded by that limit; regardless of execution order
/// the result preserves input order, with exactly one status per token.
pub fn build_report(
    tokens: &[TrackedToken],
    authority: &dyn CredentialAuthority,
    parallelism: usize,
) -> InventoryReport {
    // Single `now` snapshot so processing-time skew cannot flip the
    // expiring-soon flag between entries of one report.
    let now = Utc::now();
    let statuses = if parallelism <= 1 || tokens.len() <= 1 {
        tokens.iter().map(|t| resolve(t, now, authority)).collect()
    } else {
        resolve_parallel(tokens, now, authority, parallelism)
    };
    InventoryReport {
        generated_at: now,
        statuses,
        source_error: None,
    }
}

/// Read the tracked-token source fresh and build the report from it.
/// A broken source yields an empty report carrying the condition.
pub fn report_from_source(
    path: &std::path::Path,
    authority: &dyn CredentialAuthority,
    parallelism: usize,
) -> InventoryReport {
    let (tokens, source_error) = crate::tracked::TokenFile::load_or_report(path);
    match source_error {
        Some(msg) => InventoryReport::source_failure(msg),
        None => build_report(&tokens, authority, parallelism),
    }
}

/// Bounded worker pool over a shared index counter. Each worker claims the
/// next unresolved token and writes into its own slot, so no ordering is
/// lost and no entry can block another beyond the authority timeout.
fn resolve_parallel(
    tokens: &[TrackedToken],
    now: DateTime<Utc>,
    authority: &dyn CredentialAuthority,
    parallelism: usize,
) -> Vec<TokenStatus> {
    let next = AtomicUsize::new(0);
    let slots: Vec<Mutex<Option<TokenStatus>>> =
        tokens.iter().map(|_| Mutex::new(None)).collect();

    std::thread::scope(|scope| {
        for _ in 0..parallelism.min(tokens.len()) {
            scope.spawn(|| loop {
                let i = next.fetch_add(1, Ordering::SeqCst);
                if i >= tokens.len() {
                    break;
                }
                let status = resolve(&tokens[i], now, authority);
                if let Ok(mut slot) = slots[i].lock() {
                    *slot = Some(status);
                }
            });
        }
    });

    slots
        .into_iter()
        .zip(tokens)
        .map(|(slot, token)| {
            slot.into_inner()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                // A slot is only empty if its worker died; resolve inline
                // rather than dropping the entry.
                .unwrap_or_else(|| resolve(token, now, authority))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
