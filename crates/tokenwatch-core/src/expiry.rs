use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Threshold below which an active token counts as expiring soon.
pub const EXPIRING_SOON_DAYS: i64 = 30;

/// Normalized expiry state for one tracked token. Exactly one variant holds
/// per status; rendering and the expiring-soon highlight derive from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Classification {
    /// The authority reports no expiration for this token.
    NoExpiry,
    /// Token is live; `remaining_secs` counts down to `expire_time`.
    Active { remaining_secs: i64, display: String },
    /// The expiry timestamp is in the past.
    Expired,
    /// The tracked entry carried no accessor, so no lookup was made.
    MissingAccessor,
    /// The authority refused the lookup for lack of rights.
    PermissionDenied,
    /// The authority has no record for the accessor.
    InvalidAccessor,
    /// Transport failure, timeout, or unexpected authority response.
    AuthorityError { detail: String },
}

impl Classification {
    pub fn is_active(&self) -> bool {
        matches!(self, Classification::Active { .. })
    }

    /// Remaining validity, only meaningful for `Active`.
    pub fn remaining(&self) -> Option<Duration> {
        match self {
            Classification::Active { remaining_secs, .. } => {
                Some(Duration::seconds(*remaining_secs))
            }
            _ => None,
        }
    }

    /// Derived predicate: active with fewer than 30 days of validity left.
    /// `Active` is only built for strictly future expiries, so any remaining
    /// count under the threshold qualifies, including a truncated zero.
    pub fn is_expiring_soon(&self) -> bool {
        match self {
            Classification::Active { remaining_secs, .. } => {
                *remaining_secs < EXPIRING_SOON_DAYS * 24 * 3600
            }
            _ => false,
        }
    }

    /// Short operator-facing label for the non-active variants.
    pub fn label(&self) -> &str {
        match self {
            Classification::NoExpiry => "No expiry",
            Classification::Active { display, .. } => display,
            Classification::Expired => "Expired",
            Classification::MissingAccessor => "No accessor",
            Classification::PermissionDenied => "Permission denied",
            Classification::InvalidAccessor => "Invalid accessor",
            Classification::AuthorityError { .. } => "Authority error",
        }
    }
}

// ---------------------------------------------------------------------------
// classify
// ---------------------------------------------------------------------------

/// Classify an optional expiry timestamp against a single `now` snapshot.
///
/// Both timestamps are UTC; the week display is deliberately coarse:
/// `weeks = floor(whole_days / 7)`.
pub fn classify(expire_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Classification {
    let Some(expire_at) = expire_at else {
        return Classification::NoExpiry;
    };
    let delta = expire_at - now;
    if delta <= Duration::zero() {
        return Classification::Expired;
    }
    Classification::Active {
        remaining_secs: delta.num_seconds(),
        display: weeks_display(delta),
    }
}

fn weeks_display(remaining: Duration) -> String {
    let weeks = remaining.num_days() / 7;
    if weeks == 1 {
        "1 week".to_string()
    } else {
        format!("{} weeks", weeks)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn absent_timestamp_is_no_expiry() {
        assert_eq!(classify(None, Utc::now()), Classification::NoExpiry);
    }

    #[test]
    fn future_timestamp_is_active_with_positive_remaining() {
        let now = at(1_000_000);
        let c = classify(Some(now + Duration::days(45)), now);
        assert!(c.is_active());
        assert!(c.remaining().unwrap() > Duration::zero());
    }

    #[test]
    fn past_timestamp_is_expired() {
        let now = at(1_000_000);
        let c = classify(Some(now - Duration::seconds(1)), now);
        assert_eq!(c, Classification::Expired);
    }

    #[test]
    fn exact_now_is_expired() {
        let now = at(1_000_000);
        assert_eq!(classify(Some(now), now), Classification::Expired);
    }

    #[test]
    fn twenty_one_days_displays_three_weeks() {
        let now = at(0);
        let c = classify(Some(now + Duration::days(21)), now);
        assert_eq!(c.label(), "3 weeks");
    }

    #[test]
    fn twenty_days_floors_to_two_weeks() {
        let now = at(0);
        let c = classify(Some(now + Duration::days(20)), now);
        assert_eq!(c.label(), "2 weeks");
    }

    #[test]
    fn under_two_weeks_uses_singular() {
        let now = at(0);
        let c = classify(Some(now + Duration::days(10)), now);
        assert_eq!(c.label(), "1 week");
    }

    #[test]
    fn partial_day_truncates_before_week_division() {
        // 20 days 23 hours: whole days = 20, floor(20 / 7) = 2.
        let now = at(0);
        let c = classify(Some(now + Duration::days(20) + Duration::hours(23)), now);
        assert_eq!(c.label(), "2 weeks");
    }

    #[test]
    fn expiring_soon_under_thirty_days() {
        let now = at(0);
        let c = classify(Some(now + Duration::days(29)), now);
        assert!(c.is_expiring_soon());
    }

    #[test]
    fn subsecond_remaining_is_active_and_expiring_soon() {
        // Whole-second truncation drops a 500ms remainder to zero; the token
        // is still live and must keep the expiring-soon highlight.
        let now = at(1_000_000);
        let c = classify(Some(now + Duration::milliseconds(500)), now);
        assert_eq!(
            c,
            Classification::Active {
                remaining_secs: 0,
                display: "0 weeks".to_string()
            }
        );
        assert!(c.is_expiring_soon());
    }

    #[test]
    fn not_expiring_soon_at_thirty_days() {
        let now = at(0);
        let c = classify(Some(now + Duration::days(30)), now);
        assert!(!c.is_expiring_soon());
    }

    #[test]
    fn expiring_soon_false_for_non_active_variants() {
        assert!(!Classification::Expired.is_expiring_soon());
        assert!(!Classification::NoExpiry.is_expiring_soon());
        assert!(!Classification::MissingAccessor.is_expiring_soon());
        assert!(!Classification::PermissionDenied.is_expiring_soon());
        assert!(!Classification::InvalidAccessor.is_expiring_soon());
        assert!(!Classification::AuthorityError {
            detail: "timeout".to_string()
        }
        .is_expiring_soon());
    }

    #[test]
    fn classification_json_tagged() {
        let c = Classification::AuthorityError {
            detail: "connection refused".to_string(),
        };
        let json = serde_json::to_string(&c).unwrap();
        assert!(json.contains("\"state\":\"authority_error\""));
        let parsed: Classification = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, c);
    }
}
