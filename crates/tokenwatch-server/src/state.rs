use std::sync::Arc;

use tokenwatch_core::authority::CredentialAuthority;
use tokenwatch_core::config::Config;
use tokenwatch_core::inventory::{self, InventoryReport};

/// Shared application state passed to all route handlers. The authority
/// handle is injected so tests can swap in a double, and is shared read-only
/// across concurrent requests.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub authority: Arc<dyn CredentialAuthority>,
}

impl AppState {
    pub fn new(config: Config) -> tokenwatch_core::Result<Self> {
        let client = config.client()?;
        Ok(Self::with_authority(config, Arc::new(client)))
    }

    pub fn with_authority(config: Config, authority: Arc<dyn CredentialAuthority>) -> Self {
        Self {
            config: Arc::new(config),
            authority,
        }
    }

    /// Build a fresh report from the configured token source. Blocking;
    /// handlers call this under `spawn_blocking`.
    pub fn build_report(&self) -> InventoryReport {
        inventory::report_from_source(
            &self.config.tokens_file,
            self.authority.as_ref(),
            self.config.lookup_parallelism,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            vault_addr: "http://127.0.0.1:8200".to_string(),
            vault_token: "t".to_string(),
            tokens_file: "/nonexistent/tokens.yaml".into(),
            renew_increment_hours: 2160,
            request_timeout_secs: 2,
            lookup_parallelism: 2,
        }
    }

    #[test]
    fn new_state_builds_vault_client() {
        assert!(AppState::new(test_config()).is_ok());
    }
}
