use anyhow::Result;

use tokenwatch_core::config::Config;
use tokenwatch_core::inventory::{self, TokenStatus};

use crate::output::{print_json, print_table};

pub fn run(config: &Config, json: bool) -> Result<()> {
    let client = config.client()?;
    let report = inventory::report_from_source(
        &config.tokens_file,
        &client,
        config.lookup_parallelism,
    );

    if json {
        let entries: Vec<serde_json::Value> = report
            .statuses
            .iter()
            .map(|s| {
                serde_json::json!({
                    "name": s.name,
                    "accessor": s.accessor,
                    "policies": s.policies,
                    "expiry": s.expiry,
                    "expiring_soon": s.is_expiring_soon(),
                    "expires_at": s.raw_expiry_time,
                })
            })
            .collect();
        return print_json(&serde_json::json!({
            "generated_at": report.generated_at,
            "source_error": report.source_error,
            "tokens": entries,
        }));
    }

    if let Some(err) = &report.source_error {
        eprintln!("warning: {err}");
    }

    let rows: Vec<Vec<String>> = report.statuses.iter().map(table_row).collect();
    print_table(
        &["NAME", "ACCESSOR", "EXPIRY", "EXPIRES AT", "POLICIES", "SOON"],
        &rows,
    );
    Ok(())
}

fn table_row(status: &TokenStatus) -> Vec<String> {
    vec![
        status.name.clone(),
        status.accessor.clone(),
        status.expiry.label().to_string(),
        status.absolute_expiry(),
        status.policies.join(","),
        if status.is_expiring_soon() { "yes" } else { "" }.to_string(),
    ]
}
