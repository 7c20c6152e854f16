//! # Billing Client
//!
//! The HTTP plumbing every endpoint goes through.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  endpoint method (invoices.rs, payments.rs, ...)                        │
//! │       │                                                                 │
//! │       ├── local checks: session present, role allowed, input valid      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  authed(method, segments)     Bearer <token>                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  send(builder)                X-Request-Id: <uuid v4>                   │
//! │       │                                                                 │
//! │       ├── transport failure ──► Connection / Timeout                    │
//! │       ├── non-2xx ────────────► from_status(status, body.message)       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  send_json::<T>()             body ──► T, or Deserialization            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! One request per operation. Nothing is retried.

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Instant;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::responses::{Acknowledgement, ErrorBody};
use crate::session::Session;

/// Header carrying the per-request correlation id (`X-Request-Id`).
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// REST client for the billing backend.
#[derive(Debug, Clone)]
pub struct BillingClient {
    http: Client,
    base_url: Url,
    timeout_secs: u64,
    session: Option<Session>,
}

impl BillingClient {
    /// Builds a client from validated configuration.
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        config.validate()?;

        let http = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("billing-console/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::InvalidConfig(format!("Failed to create HTTP client: {e}")))?;

        Ok(BillingClient {
            http,
            base_url: Url::parse(config.base_url())?,
            timeout_secs: config.api.timeout_secs,
            session: None,
        })
    }

    /// Attaches a stored session.
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn set_session(&mut self, session: Option<Session>) {
        self.session = session;
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // =========================================================================
    // Local Checks
    // =========================================================================

    pub(crate) fn current_session(&self) -> ApiResult<&Session> {
        self.session.as_ref().ok_or(ApiError::NotLoggedIn)
    }

    /// Refuses admin-only operations for the `user` role without a round trip.
    pub(crate) fn require_admin(&self, action: &str) -> ApiResult<&Session> {
        let session = self.current_session()?;
        if !session.is_admin() {
            warn!(email = %session.email, action, "Admin-only operation refused");
            return Err(ApiError::Forbidden(format!("Only admins can {action}")));
        }
        Ok(session)
    }

    // =========================================================================
    // Request Building
    // =========================================================================

    /// Appends path segments to the base URL, percent-encoding each one.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidConfig(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// A request without credentials (login only).
    pub(crate) fn anonymous(&self, method: Method, segments: &[&str]) -> ApiResult<RequestBuilder> {
        Ok(self.http.request(method, self.endpoint(segments)?))
    }

    /// A request carrying the session's bearer token.
    pub(crate) fn authed(&self, method: Method, segments: &[&str]) -> ApiResult<RequestBuilder> {
        let session = self.current_session()?;
        Ok(self
            .http
            .request(method, self.endpoint(segments)?)
            .bearer_auth(&session.token))
    }

    // =========================================================================
    // Sending
    // =========================================================================

    /// Sends a request and turns transport failures and non-2xx statuses into
    /// [`ApiError`]s.
    pub(crate) async fn send(&self, builder: RequestBuilder) -> ApiResult<Response> {
        let request_id = Uuid::new_v4().to_string();
        let mut request = builder
            .build()
            .map_err(|e| ApiError::InvalidConfig(format!("Failed to build request: {e}")))?;

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            request.headers_mut().insert(REQUEST_ID_HEADER, value);
        }

        let method = request.method().clone();
        let path = request.url().path().to_string();
        debug!(%method, %path, %request_id, "Sending request");

        let started = Instant::now();
        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let elapsed_ms = started.elapsed().as_millis() as u64;
        debug!(%method, %path, %request_id, status = status.as_u16(), elapsed_ms, "Response received");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let message = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message);
        warn!(%method, %path, %request_id, status = status.as_u16(), ?message, "Request failed");

        Err(ApiError::from_status(status.as_u16(), message))
    }

    /// Sends a request and decodes a JSON body.
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let response = self.send(builder).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Sends a mutating request and reads its `{success, message}` reply.
    ///
    /// An empty body counts as success; `success: false` becomes
    /// [`ApiError::Rejected`] with the backend's message or `fallback`.
    pub(crate) async fn send_ack(
        &self,
        builder: RequestBuilder,
        fallback: &str,
    ) -> ApiResult<Acknowledgement> {
        let response = self.send(builder).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Acknowledgement::default());
        }

        let ack: Acknowledgement = serde_json::from_slice(&bytes)?;
        if ack.is_rejected() {
            return Err(ApiError::Rejected(
                ack.message.unwrap_or_else(|| fallback.to_string()),
            ));
        }
        Ok(ack)
    }

    /// Sends a request and returns the raw body, checking it is not JSON
    /// when a document was expected.
    pub(crate) async fn send_bytes(&self, builder: RequestBuilder) -> ApiResult<Vec<u8>> {
        let response = self.send(builder).await?;
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/json"));
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        if is_json {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| "expected a document, got JSON".to_string());
            return Err(ApiError::Deserialization(message));
        }

        Ok(bytes.to_vec())
    }

    fn transport_error(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            return ApiError::Timeout(self.timeout_secs);
        }
        if err.is_decode() {
            return ApiError::Deserialization(err.to_string());
        }
        if err.is_connect() {
            return ApiError::Connection(format!("{} ({err})", self.base_url));
        }
        ApiError::Connection(err.to_string())
    }
}
