use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::time::Duration as StdDuration;

use crate::authority::{AuthorityError, CredentialAuthority, TokenLookup};
use crate::error::Result;

// ---------------------------------------------------------------------------
// VaultClient
// ---------------------------------------------------------------------------

/// HTTP client for the Vault token API (`/v1/auth/token/*-accessor`).
///
/// One instance is shared process-wide; reqwest's blocking client is
/// internally pooled and safe for concurrent use. Every request carries the
/// configured timeout, so a hung authority surfaces as
/// `AuthorityErrorKind::Other` instead of blocking a report build forever.
pub struct VaultClient {
    http: reqwest::blocking::Client,
    addr: String,
    token: String,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    data: LookupData,
}

#[derive(Deserialize, Default)]
struct LookupData {
    #[serde(default)]
    policies: Vec<String>,
    #[serde(default)]
    expire_time: Option<DateTime<Utc>>,
}

/// Vault error payloads are `{"errors": ["…", …]}`.
#[derive(Deserialize, Default)]
struct ErrorResponse {
    #[serde(default)]
    errors: Vec<String>,
}

impl VaultClient {
    pub fn new(addr: impl Into<String>, token: impl Into<String>, timeout: StdDuration) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            addr: addr.into(),
            token: token.into(),
        })
    }

    fn post(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> std::result::Result<reqwest::blocking::Response, AuthorityError> {
        let url = format!("{}/v1/{}", self.addr.trim_end_matches('/'), path);
        let response = self
            .http
            .post(&url)
            .header("X-Vault-Token", &self.token)
            .json(&body)
            .send()
            .map_err(|e| AuthorityError::other(format!("vault request failed: {e}")))?;
        check_status(response)
    }
}

/// Map an HTTP status onto the closed authority error-kind set.
fn check_status(
    response: reqwest::blocking::Response,
) -> std::result::Result<reqwest::blocking::Response, AuthorityError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let detail = error_detail(response);
    match status.as_u16() {
        403 => Err(AuthorityError::permission_denied(detail)),
        400 | 404 => Err(AuthorityError::invalid_request(detail)),
        code => Err(AuthorityError::other(format!("vault returned {code}: {detail}"))),
    }
}

fn error_detail(response: reqwest::blocking::Response) -> String {
    let parsed: ErrorResponse = response.json().unwrap_or_default();
    if parsed.errors.is_empty() {
        "no error detail from vault".to_string()
    } else {
        parsed.errors.join("; ")
    }
}

impl CredentialAuthority for VaultClient {
    fn lookup_accessor(&self, accessor: &str) -> std::result::Result<TokenLookup, AuthorityError> {
        let response = self.post(
            "auth/token/lookup-accessor",
            serde_json::json!({ "accessor": accessor }),
        )?;
        let parsed: LookupResponse = response
            .json()
            .map_err(|e| AuthorityError::other(format!("unexpected lookup payload: {e}")))?;
        Ok(TokenLookup {
            policies: parsed.data.policies,
            expire_time: parsed.data.expire_time,
        })
    }

    fn renew_accessor(
        &self,
        accessor: &str,
        increment: Duration,
    ) -> std::result::Result<(), AuthorityError> {
        self.post(
            "auth/token/renew-accessor",
            serde_json::json!({
                "accessor": accessor,
                "increment": increment.num_seconds(),
            }),
        )?;
        Ok(())
    }

    fn revoke_accessor(&self, accessor: &str) -> std::result::Result<(), AuthorityError> {
        self.post(
            "auth/token/revoke-accessor",
            serde_json::json!({ "accessor": accessor }),
        )?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
