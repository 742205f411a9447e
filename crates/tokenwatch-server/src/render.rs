//! Server-rendered inventory page. Deliberately a single static HTML
//! document per request: the report is rebuilt from scratch on every load,
//! so there is no client-side state to keep in sync.

use tokenwatch_core::inventory::{InventoryReport, TokenStatus};

const PAGE_STYLE: &str = "body{font-family:sans-serif;margin:2rem;background:#fafafa}\
h1{font-size:1.4rem}\
table{border-collapse:collapse;width:100%;background:#fff}\
th,td{border:1px solid #ddd;padding:8px 10px;text-align:left;font-size:0.9rem}\
th{background:#f0f0f0}\
tr.expiring-soon td{background:#fff3cd}\
td.status-error{color:#b00020}\
.notice{background:#e7f3e7;border:1px solid #9c9;padding:8px 12px;margin-bottom:1rem}\
.source-error{background:#fdecea;border:1px solid #c66;padding:8px 12px;margin-bottom:1rem}\
form{display:inline;margin-right:4px}\
button{padding:3px 10px;cursor:pointer}";

/// Escape text for safe interpolation into HTML content and attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn row(status: &TokenStatus) -> String {
    let row_class = if status.is_expiring_soon() {
        " class=\"expiring-soon\""
    } else {
        ""
    };
    let is_error = !matches!(
        status.expiry,
        tokenwatch_core::expiry::Classification::NoExpiry
            | tokenwatch_core::expiry::Classification::Active { .. }
    );
    let status_class = if is_error { " class=\"status-error\"" } else { "" };
    let accessor = escape_html(&status.accessor);

    format!(
        "<tr{row_class}>\
         <td>{name}</td>\
         <td><code>{accessor}</code></td>\
         <td{status_class}>{expiry}</td>\
         <td>{absolute}</td>\
         <td>{policies}</td>\
         <td>\
         <form method=\"post\" action=\"/renew\">\
         <input type=\"hidden\" name=\"accessor\" value=\"{accessor}\">\
         <button type=\"submit\">Renew</button></form>\
         <form method=\"post\" action=\"/revoke\">\
         <input type=\"hidden\" name=\"accessor\" value=\"{accessor}\">\
         <button type=\"submit\">Revoke</button></form>\
         </td></tr>",
        name = escape_html(&status.name),
        expiry = escape_html(status.expiry.label()),
        absolute = escape_html(&status.absolute_expiry()),
        policies = escape_html(&status.policies.join(", ")),
    )
}

pub fn render_index(report: &InventoryReport, notice: Option<&str>) -> String {
    let mut body = String::new();

    if let Some(notice) = notice {
        body.push_str(&format!(
            "<div class=\"notice\">{}</div>",
            escape_html(notice)
        ));
    }
    if let Some(err) = &report.source_error {
        body.push_str(&format!(
            "<div class=\"source-error\">No tracked tokens: {}</div>",
            escape_html(err)
        ));
    }

    body.push_str(
        "<table><tr><th>Name</th><th>Accessor</th><th>Expiry</th>\
         <th>Expires at</th><th>Policies</th><th>Actions</th></tr>",
    );
    for status in &report.statuses {
        body.push_str(&row(status));
    }
    body.push_str("</table>");

    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\">\
         <title>tokenwatch</title><style>{PAGE_STYLE}</style></head>\
         <body><h1>Tracked tokens</h1>\
         <p>Report generated {generated} — {count} tracked</p>\
         {body}</body></html>",
        generated = report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        count = report.statuses.len(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tokenwatch_core::expiry::Classification;

    fn status(expiry: Classification) -> TokenStatus {
        TokenStatus {
            name: "ci deploy".to_string(),
            accessor: "acc-1".to_string(),
            policies: vec!["default".to_string()],
            expiry,
            raw_expiry_time: None,
        }
    }

    fn report(statuses: Vec<TokenStatus>) -> InventoryReport {
        InventoryReport {
            generated_at: Utc::now(),
            statuses,
            source_error: None,
        }
    }

    #[test]
    fn escapes_html_metacharacters() {
        assert_eq!(
            escape_html("<b>\"x\" & 'y'</b>"),
            "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn active_row_shows_week_display() {
        let html = render_index(
            &report(vec![status(Classification::Active {
                remaining_secs: 21 * 86400,
                display: "3 weeks".to_string(),
            })]),
            None,
        );
        assert!(html.contains("3 weeks"));
        assert!(html.contains("acc-1"));
        assert!(!html.contains("expiring-soon"));
    }

    #[test]
    fn expiring_soon_row_is_highlighted() {
        let html = render_index(
            &report(vec![status(Classification::Active {
                remaining_secs: 10 * 86400,
                display: "1 week".to_string(),
            })]),
            None,
        );
        assert!(html.contains("class=\"expiring-soon\""));
    }

    #[test]
    fn failure_kinds_render_distinctly() {
        let html = render_index(
            &report(vec![
                status(Classification::PermissionDenied),
                status(Classification::InvalidAccessor),
            ]),
            None,
        );
        assert!(html.contains("Permission denied"));
        assert!(html.contains("Invalid accessor"));
    }

    #[test]
    fn notice_and_source_error_render() {
        let mut r = report(vec![]);
        r.source_error = Some("tokens.yaml unreadable".to_string());
        let html = render_index(&r, Some("Revoked token acc-1"));
        assert!(html.contains("Revoked token acc-1"));
        assert!(html.contains("No tracked tokens"));
    }

    #[test]
    fn token_names_are_escaped() {
        let mut s = status(Classification::NoExpiry);
        s.name = "<script>alert(1)</script>".to_string();
        let html = render_index(&report(vec![s]), None);
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
