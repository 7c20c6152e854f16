//! # Console State
//!
//! Configuration, the session store and the client, assembled once per
//! command.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Console::open(--config)                                                │
//! │     │                                                                   │
//! │     ├── ApiConfig::load      defaults ◄── console.toml ◄── BILLING_*    │
//! │     ├── SessionStore         config.session_path()                      │
//! │     └── BillingClient::new   anonymous                                  │
//! │                                                                         │
//! │  console.signed_in()                                                    │
//! │     └── SessionStore::require ──► BillingClient::with_session           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use billing_api::{ApiConfig, ApiError, BillingClient, SessionStore};
use tracing::debug;

pub struct Console {
    pub config: ApiConfig,
    pub config_path: Option<PathBuf>,
    pub store: SessionStore,
    pub client: BillingClient,
}

impl Console {
    pub fn open(config_path: Option<PathBuf>) -> Result<Self> {
        let config = ApiConfig::load(config_path.clone())?;
        Self::with_config(config, config_path)
    }

    pub fn with_config(config: ApiConfig, config_path: Option<PathBuf>) -> Result<Self> {
        let session_path = config
            .session_path()
            .ok_or_else(|| ApiError::SessionStorage("No data directory available".into()))?;
        let client = BillingClient::new(&config)?;

        debug!(base_url = %config.base_url(), session = ?session_path, "Console ready");

        Ok(Console {
            config,
            config_path,
            store: SessionStore::new(session_path),
            client,
        })
    }

    /// Attaches the stored session, failing with "Not logged in" when there
    /// is none.
    pub fn signed_in(mut self) -> Result<Self> {
        let session = self.store.require()?;
        self.client = self.client.with_session(session);
        Ok(self)
    }

    /// Where `config --save` writes.
    pub fn config_file(&self) -> Result<PathBuf> {
        self.config_path
            .clone()
            .or_else(ApiConfig::default_config_path)
            .context("no config directory available")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use billing_api::Session;
    use billing_core::{Role, User};
    use tempfile::TempDir;

    fn console_in(dir: &TempDir) -> Console {
        let mut config = ApiConfig::default();
        config.session.path = Some(dir.path().join("session.toml"));
        Console::with_config(config, Some(dir.path().join("console.toml"))).unwrap()
    }

    #[test]
    fn test_signed_in_requires_session() {
        let dir = TempDir::new().unwrap();
        let err = console_in(&dir).signed_in().err().unwrap();
        assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::NotLoggedIn)));
    }

    #[test]
    fn test_signed_in_attaches_stored_session() {
        let dir = TempDir::new().unwrap();
        let console = console_in(&dir);
        let user = User {
            id: "u-1".to_string(),
            email: "ravi@example.com".to_string(),
            role: Role::User,
            name: None,
        };
        console.store.save(&Session::new("tok", &user)).unwrap();

        let console = console.signed_in().unwrap();
        let session = console.client.session().unwrap();
        assert_eq!(session.email, "ravi@example.com");
        assert_eq!(console.config_file().unwrap(), dir.path().join("console.toml"));
    }
}
