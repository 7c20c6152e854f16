//! # Login Session
//!
//! The bearer token and who it belongs to, kept on disk between console runs.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  billing login ──► POST /auth/login ──► Session ──► SessionStore::save  │
//! │                                                                         │
//! │  billing <cmd> ──► SessionStore::load ──► Bearer <token> on each call   │
//! │                           │                                             │
//! │                           └── none ──► ApiError::NotLoggedIn            │
//! │                                                                         │
//! │  billing whoami ──► POST /auth/validate                                 │
//! │                           │                                             │
//! │                           └── rejected ──► SessionStore::clear          │
//! │                                                                         │
//! │  billing logout ──► SessionStore::clear                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## File Format
//! ```toml
//! # session.toml
//! token = "eyJhbGciOi..."
//! role = "admin"
//! email = "meera@example.com"
//! name = "Meera"
//! user_id = "65f1c2..."
//! logged_in_at = "2024-12-14T10:23:00Z"
//! ```

use billing_core::{Role, User};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};

/// An authenticated staff session.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub role: Role,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub user_id: String,
    pub logged_in_at: DateTime<Utc>,
}

impl Session {
    /// Builds a session from a successful login.
    pub fn new(token: impl Into<String>, user: &User) -> Self {
        Session {
            token: token.into(),
            role: user.role,
            email: user.email.clone(),
            name: user.name.clone(),
            user_id: user.id.clone(),
            logged_in_at: Utc::now(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Name for greetings, falling back to the email address.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.email)
    }
}

// The token never goes to logs.
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("role", &self.role)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("user_id", &self.user_id)
            .field("logged_in_at", &self.logged_in_at)
            .finish()
    }
}

// =============================================================================
// Session Store
// =============================================================================

/// Reads and writes the session file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SessionStore { path: path.into() }
    }

    /// Store at the platform default location.
    pub fn open_default() -> ApiResult<Self> {
        Self::default_path()
            .map(Self::new)
            .ok_or_else(|| ApiError::SessionStorage("No data directory available".into()))
    }

    /// `<data dir>/billing/session.toml`.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "billing")
            .map(|dirs| dirs.data_dir().join("session.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the stored session, or `None` when nobody is logged in.
    pub fn load(&self) -> ApiResult<Option<Session>> {
        if !self.path.exists() {
            debug!(path = ?self.path, "No session file");
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path)
            .map_err(|e| ApiError::SessionStorage(format!("{}: {e}", self.path.display())))?;
        let session: Session = toml::from_str(&contents)
            .map_err(|e| ApiError::SessionStorage(format!("corrupt session file: {e}")))?;

        Ok(Some(session))
    }

    /// Like [`load`](Self::load), but a missing session is an error.
    pub fn require(&self) -> ApiResult<Session> {
        self.load()?.ok_or(ApiError::NotLoggedIn)
    }

    /// Persists the session, replacing any previous one.
    pub fn save(&self, session: &Session) -> ApiResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ApiError::SessionStorage(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(session)
            .map_err(|e| ApiError::SessionStorage(e.to_string()))?;
        std::fs::write(&self.path, contents)
            .map_err(|e| ApiError::SessionStorage(e.to_string()))?;
        restrict_permissions(&self.path)?;

        info!(email = %session.email, role = %session.role, "Session saved");
        Ok(())
    }

    /// Removes the session file. Returns false if there was nothing to remove.
    pub fn clear(&self) -> ApiResult<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = ?self.path, "Session cleared");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ApiError::SessionStorage(e.to_string())),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> ApiResult<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| ApiError::SessionStorage(e.to_string()))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> ApiResult<()> {
    Ok(())
}
