use anyhow::{bail, Result};

use tokenwatch_core::config::{Config, MAX_RENEW_INCREMENT_HOURS};
use tokenwatch_core::lifecycle::{self, LifecycleAction};

use crate::output::print_json;

/// Run one lifecycle action and report its outcome. A failed outcome exits
/// nonzero so scripts can chain on success.
pub fn run(
    config: &Config,
    action: LifecycleAction,
    accessor: &str,
    increment_hours: Option<u64>,
    json: bool,
) -> Result<()> {
    let client = config.client()?;
    let outcome = match action {
        LifecycleAction::Renew => {
            // The argument parser bounds the override, but clamp anyway so
            // this path can never abort on an hour count out of range.
            let increment = increment_hours
                .map(|h| chrono::Duration::hours(h.min(MAX_RENEW_INCREMENT_HOURS) as i64))
                .unwrap_or_else(|| config.renew_increment());
            lifecycle::renew(accessor, &client, increment)
        }
        LifecycleAction::Revoke => lifecycle::revoke(accessor, &client),
    };

    let message = lifecycle::operator_message(&outcome);
    if json {
        let mut value = serde_json::json!(outcome);
        value["message"] = serde_json::Value::String(message.clone());
        print_json(&value)?;
    } else {
        println!("{message}");
    }

    if !outcome.succeeded() {
        bail!("{} failed for {}", outcome.action, outcome.accessor);
    }
    Ok(())
}
