//! Login and session validation.

use billing_core::ValidationError;
use reqwest::Method;
use serde_json::json;
use tracing::{info, warn};

use crate::client::BillingClient;
use crate::error::{ApiError, ApiResult};
use crate::responses::{LoginRequest, LoginResponse, ValidateResponse};
use crate::session::Session;

impl BillingClient {
    /// Exchanges credentials for a bearer token and attaches the new session.
    ///
    /// The caller persists the returned session.
    pub async fn login(&mut self, email: &str, password: &str) -> ApiResult<Session> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ValidationError::Required { field: "Email".into() }.into());
        }
        if password.is_empty() {
            return Err(ValidationError::Required { field: "Password".into() }.into());
        }

        let request = self
            .anonymous(Method::POST, &["auth", "login"])?
            .json(&LoginRequest { email, password });
        let response: LoginResponse = self.send_json(request).await?;

        if response.token.trim().is_empty() {
            return Err(ApiError::Deserialization("login response carried no token".into()));
        }

        let session = Session::new(response.token, &response.user);
        info!(email = %session.email, role = %session.role, message = %response.message, "Logged in");
        self.set_session(Some(session.clone()));
        Ok(session)
    }

    /// Asks the backend whether the attached token is still good.
    ///
    /// A 401 answers "no" rather than failing; other errors propagate.
    pub async fn validate_session(&self) -> ApiResult<bool> {
        let request = self
            .authed(Method::POST, &["auth", "validate"])?
            .json(&json!({}));

        match self.send_json::<ValidateResponse>(request).await {
            Ok(response) => Ok(response.success),
            Err(ApiError::Unauthorized(reason)) => {
                warn!(%reason, "Session rejected by backend");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Detaches the session from this client.
    pub fn logout(&mut self) -> Option<Session> {
        let session = self.session().cloned();
        self.set_session(None);
        session
    }
}
