//! # billing-api: REST Client for the Billing Backend
//!
//! Everything that leaves the machine goes through this crate: login, the
//! invoice and payment endpoints, employee management and analytics. It
//! also owns the console configuration and the on-disk login session.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    billing (console binary)                     │   │
//! │  │    login ──► invoices ──► create ──► pay ──► kyc ──► pdf       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ billing-api (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌─────────────────────────┐   │   │
//! │  │   │  config   │  │  session  │  │ BillingClient           │   │   │
//! │  │   │ TOML+env  │  │ TOML file │  │ auth, invoices,         │   │   │
//! │  │   └───────────┘  └───────────┘  │ payments, users,        │   │   │
//! │  │                                 │ analytics               │   │   │
//! │  │                                 └─────────────────────────┘   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTPS + JSON, Bearer token             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    Billing backend (/api/v1)                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`client`] - Request building, correlation ids, status mapping
//! - [`config`] - Base URL, timeout and session path (TOML + environment)
//! - [`session`] - Persisted bearer token and role
//! - [`error`] - [`ApiError`] and user-facing messages
//! - [`invoices`] - Invoice endpoints and [`KycOutcome`]
//!
//! Login, payments, employees and analytics add methods to
//! [`BillingClient`] from private modules.
//!
//! ## Local Checks
//!
//! Input is validated with `billing-core` before any request is made, and
//! admin-only operations are refused for the `user` role without a round
//! trip. The backend remains the authority on both.

// =============================================================================
// Module Declarations
// =============================================================================

mod analytics;
mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod invoices;
mod payments;
pub mod responses;
pub mod session;
mod users;

// =============================================================================
// Re-exports
// =============================================================================

pub use client::{BillingClient, REQUEST_ID_HEADER};
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use invoices::KycOutcome;
pub use responses::Acknowledgement;
pub use session::{Session, SessionStore};
