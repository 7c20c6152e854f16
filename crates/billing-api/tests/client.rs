//! End-to-end tests for `BillingClient` against an in-process mock backend.
//!
//! The mock records every request it receives so tests can assert both what
//! was sent and what was never sent.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use billing_api::{ApiConfig, ApiError, BillingClient, Session, REQUEST_ID_HEADER};
use billing_core::{
    Company, CoreError, Customer, InvoiceDraft, LineItem, Money, PaymentInstrument, PaymentMode,
    Role, User,
};
use serde_json::{json, Value};
use uuid::Uuid;

// =============================================================================
// Mock Backend
// =============================================================================

#[derive(Debug, Clone)]
struct Recorded {
    method: Method,
    path: String,
    authorization: Option<String>,
    request_id: Option<String>,
    body: Value,
}

#[derive(Clone, Default)]
struct Backend {
    calls: Arc<Mutex<Vec<Recorded>>>,
}

impl Backend {
    fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().unwrap().clone()
    }

    fn count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn last(&self) -> Recorded {
        self.calls().pop().expect("no request recorded")
    }
}

fn invoice_json(id: &str, remaining: i64) -> Value {
    json!({
        "_id": id,
        "company": {"name": "Sora Realtor", "address": "Pune", "phone": "020", "email": "a@b.in"},
        "customer": {"name": "Asha", "phone": "9876543210", "address": "Baner", "PAN": "ABCDE1234F"},
        "items": [{"description": "Flat 402", "projectName": "Sora Heights", "hashingCode": "9954", "rate": 4500, "areaSqFt": 1000}],
        "charges": {"parking": 100000, "amenities": 50000, "otherCharges": 0},
        "gst": {"percentage": 18, "amount": 837000},
        "payment": {"mode": "Bank Transfer"},
        "itemsTotal": 4500000,
        "subTotal": 4650000,
        "totalAmount": 5487000,
        "advance": 500000,
        "remainingAmount": remaining,
        "createdAt": "2024-12-14T10:23:00.000Z",
        "executiveName": "Ravi"
    })
}

fn user_json(email: &str) -> Value {
    let role = if email.starts_with("meera") { "admin" } else { "user" };
    json!({"_id": format!("id-{email}"), "email": email, "role": role, "name": "Staff"})
}

fn reply(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

async fn handle(
    State(backend): State<Backend>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let recorded = Recorded {
        method: method.clone(),
        path: uri.path().to_string(),
        authorization: header(AUTHORIZATION.as_str()),
        request_id: header(REQUEST_ID_HEADER),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    };
    backend.calls.lock().unwrap().push(recorded.clone());

    let path = recorded.path.trim_start_matches("/api/v1");
    let token = recorded.authorization.as_deref().unwrap_or_default();

    match (method.as_str(), path) {
        ("POST", "/auth/login") => {
            let email = recorded.body["email"].as_str().unwrap_or_default();
            if recorded.body["password"] != "secret" {
                return reply(StatusCode::UNAUTHORIZED, json!({"message": "Invalid credentials"}));
            }
            let token = if email.starts_with("meera") { "tok-admin" } else { "tok-user" };
            reply(
                StatusCode::OK,
                json!({"message": "Login successful", "token": token, "user": user_json(email)}),
            )
        }
        ("POST", "/auth/validate") => match token {
            "Bearer tok-admin" | "Bearer tok-user" => reply(StatusCode::OK, json!({"success": true})),
            _ => reply(StatusCode::UNAUTHORIZED, json!({"message": "Invalid token"})),
        },
        ("GET", "/invoices") | ("GET", "/invoices/user") => reply(
            StatusCode::OK,
            json!({"invoices": [invoice_json("inv-1", 4987000), invoice_json("inv-paid", 0)]}),
        ),
        ("POST", "/invoices/create") => reply(
            StatusCode::CREATED,
            json!({"message": "Invoice created", "invoice": invoice_json("inv-2", 5487000)}),
        ),
        ("PUT", "/invoices/update/inv-1") => reply(
            StatusCode::OK,
            json!({"message": "Payment added", "invoice": invoice_json("inv-1", 4887000)}),
        ),
        ("PUT", "/invoices/update-phone/inv-1") | ("PUT", "/invoices/update-pan/inv-1") => {
            reply(StatusCode::OK, json!({"message": "Updated"}))
        }
        ("GET", "/invoices/pdf/inv-1") => (
            [(CONTENT_TYPE, "application/pdf")],
            Bytes::from_static(b"%PDF-1.4 mock"),
        )
            .into_response(),
        ("DELETE", "/invoices/inv-1") => {
            reply(StatusCode::OK, json!({"success": true, "message": "Invoice deleted"}))
        }
        ("DELETE", "/invoices/locked") => {
            reply(StatusCode::OK, json!({"success": false, "message": "Invoice has payments"}))
        }
        ("GET", "/payments/inv-1") => reply(
            StatusCode::OK,
            json!({"success": true, "data": {
                "_id": "pay-1",
                "invoiceId": "inv-1",
                "amount": 100000,
                "customerName": "Asha",
                "paymentMode": "UPI",
                "createdAt": "2024-12-15T09:00:00.000Z"
            }}),
        ),
        ("GET", "/analytics") => reply(
            StatusCode::OK,
            json!({"message": "ok", "analytics": {"totalInvoices": 2, "totalPaid": 600000, "totalDue": 4887000}}),
        ),
        ("GET", "/analytics/summary") => reply(
            StatusCode::OK,
            json!({"analytics": {"last30DaysPayments": [
                {"price": 100000, "day": "15", "month": "Dec"},
                {"price": 250000, "day": "16", "month": "Dec"}
            ]}}),
        ),
        _ => reply(StatusCode::NOT_FOUND, json!({"message": "Invoice not found"})),
    }
}

async fn spawn_backend() -> (SocketAddr, Backend) {
    let backend = Backend::default();
    let app = Router::new().fallback(handle).with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, backend)
}

fn client_for(addr: SocketAddr) -> BillingClient {
    let mut config = ApiConfig::default();
    config.api.base_url = format!("http://{addr}/api/v1");
    config.api.timeout_secs = 5;
    BillingClient::new(&config).unwrap()
}

async fn logged_in(email: &str) -> (BillingClient, Backend) {
    let (addr, backend) = spawn_backend().await;
    let mut client = client_for(addr);
    client.login(email, "secret").await.unwrap();
    (client, backend)
}

// =============================================================================
// Auth
// =============================================================================

#[tokio::test]
async fn test_login_attaches_session_and_signs_requests() {
    let (addr, backend) = spawn_backend().await;
    let mut client = client_for(addr);

    let session = client.login("  meera@example.com ", "secret").await.unwrap();
    assert_eq!(session.role, Role::Admin);
    assert_eq!(session.token, "tok-admin");
    assert_eq!(client.session(), Some(&session));

    let login = backend.last();
    assert_eq!(login.path, "/api/v1/auth/login");
    assert_eq!(login.body["email"], "meera@example.com");
    assert_eq!(login.authorization, None);

    let invoices = client.list_invoices().await.unwrap();
    assert_eq!(invoices.len(), 2);

    let call = backend.last();
    assert_eq!(call.path, "/api/v1/invoices");
    assert_eq!(call.authorization.as_deref(), Some("Bearer tok-admin"));
    let request_id = call.request_id.expect("request id header missing");
    assert!(Uuid::parse_str(&request_id).is_ok());
    assert_ne!(login.request_id, Some(request_id));
}

#[tokio::test]
async fn test_login_failure_surfaces_backend_message() {
    let (addr, _backend) = spawn_backend().await;
    let mut client = client_for(addr);

    let err = client.login("meera@example.com", "wrong").await.unwrap_err();
    assert!(matches!(&err, ApiError::Unauthorized(msg) if msg == "Invalid credentials"));
    assert_eq!(err.user_message(), "Invalid credentials");
    assert!(client.session().is_none());
}

#[tokio::test]
async fn test_login_requires_credentials_locally() {
    let (addr, backend) = spawn_backend().await;
    let mut client = client_for(addr);

    let err = client.login("  ", "secret").await.unwrap_err();
    assert!(err.is_validation_error());
    assert_eq!(backend.count(), 0);
}

#[tokio::test]
async fn test_validate_session_treats_401_as_expired() {
    let (addr, _backend) = spawn_backend().await;
    let user = User {
        id: "u-9".to_string(),
        email: "ravi@example.com".to_string(),
        role: Role::User,
        name: None,
    };

    let stale = client_for(addr).with_session(Session::new("tok-stale", &user));
    assert!(!stale.validate_session().await.unwrap());

    let fresh = client_for(addr).with_session(Session::new("tok-user", &user));
    assert!(fresh.validate_session().await.unwrap());
}

#[tokio::test]
async fn test_logout_detaches_session() {
    let (mut client, _backend) = logged_in("ravi@example.com").await;
    let previous = client.logout().unwrap();
    assert_eq!(previous.email, "ravi@example.com");
    assert!(matches!(client.my_invoices().await, Err(ApiError::NotLoggedIn)));
}

// =============================================================================
// Role Gating
// =============================================================================

#[tokio::test]
async fn test_user_role_refused_without_round_trip() {
    let (client, backend) = logged_in("ravi@example.com").await;
    let before = backend.count();

    assert!(matches!(client.list_invoices().await, Err(ApiError::Forbidden(_))));
    assert!(matches!(client.delete_invoice("inv-1").await, Err(ApiError::Forbidden(_))));
    assert!(matches!(client.list_payments().await, Err(ApiError::Forbidden(_))));
    assert!(matches!(client.analytics().await, Err(ApiError::Forbidden(_))));
    assert!(matches!(client.list_employees().await, Err(ApiError::Forbidden(_))));
    assert_eq!(backend.count(), before);

    client.visible_invoices().await.unwrap();
    assert_eq!(backend.last().path, "/api/v1/invoices/user");
}

// =============================================================================
// Invoices & Payments
// =============================================================================

#[tokio::test]
async fn test_create_invoice_sends_computed_totals() {
    let (client, backend) = logged_in("ravi@example.com").await;

    let mut draft = InvoiceDraft::default();
    draft.company = Company::SoraRealtor;
    draft.customer = Customer {
        name: "Asha".to_string(),
        phone: "9876543210".to_string(),
        address: "Baner".to_string(),
        pan: "abcde1234f".to_string(),
        gstin: None,
    };
    draft.items[0] = LineItem {
        description: "Flat 402".to_string(),
        project_name: "Sora Heights".to_string(),
        hsn_code: "9954".to_string(),
        rate: Money::from_rupees(4_500),
        area_sq_ft: 1_000.0,
    };
    draft.charges.parking = Money::from_rupees(1_00_000);
    draft.charges.amenities = Money::from_rupees(50_000);

    let invoice = client.create_invoice(draft).await.unwrap();
    assert_eq!(invoice.id, "inv-2");

    let call = backend.last();
    assert_eq!(call.path, "/api/v1/invoices/create");
    assert_eq!(call.body["data"]["customer"]["PAN"], "ABCDE1234F");
    assert_eq!(call.body["data"]["totalAmount"].as_f64(), Some(5_487_000.0));
}

#[tokio::test]
async fn test_invalid_draft_is_not_sent() {
    let (client, backend) = logged_in("ravi@example.com").await;
    let before = backend.count();

    let err = client.create_invoice(InvoiceDraft::default()).await.unwrap_err();
    assert!(err.is_validation_error());
    assert_eq!(backend.count(), before);
}

#[tokio::test]
async fn test_payment_validated_before_request() {
    let (client, backend) = logged_in("meera@example.com").await;
    let invoice = client.find_invoice("inv-1").await.unwrap();
    let before = backend.count();

    let err = client
        .record_payment(
            &invoice,
            Money::from_rupees(50_00_000),
            PaymentInstrument::plain(PaymentMode::Upi),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ApiError::Validation(CoreError::PaymentExceedsRemaining { .. })
    ));

    let err = client
        .record_payment(
            &invoice,
            Money::from_rupees(1_00_000),
            PaymentInstrument::cheque("12AB", "SBI"),
        )
        .await
        .unwrap_err();
    assert!(err.is_validation_error());

    let settled = client.find_invoice("inv-paid").await.unwrap();
    let err = client
        .record_payment(
            &settled,
            Money::from_rupees(1),
            PaymentInstrument::plain(PaymentMode::Cash),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Validation(CoreError::AlreadySettled { .. })));

    assert_eq!(backend.count(), before);
}

#[tokio::test]
async fn test_record_cheque_payment() {
    let (client, backend) = logged_in("meera@example.com").await;
    let invoice = client.find_invoice("inv-1").await.unwrap();

    let updated = client
        .record_payment(
            &invoice,
            Money::from_rupees(1_00_000),
            PaymentInstrument::cheque("123456", "SBI"),
        )
        .await
        .unwrap();
    assert_eq!(updated.remaining_amount, Money::from_rupees(48_87_000));

    let call = backend.last();
    assert_eq!(call.method, Method::PUT);
    assert_eq!(call.path, "/api/v1/invoices/update/inv-1");
    assert_eq!(call.body["paymentMode"], "Cheque");
    assert_eq!(call.body["chequeNumber"], "123456");
    assert_eq!(call.body["customerName"], "Asha");
    assert_eq!(call.body["amount"].as_f64(), Some(100_000.0));
}

#[tokio::test]
async fn test_find_invoice_not_visible() {
    let (client, _backend) = logged_in("meera@example.com").await;
    let err = client.find_invoice("inv-404").await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(msg) if msg.contains("inv-404")));
}

#[tokio::test]
async fn test_kyc_sends_only_changed_fields() {
    let (client, backend) = logged_in("ravi@example.com").await;
    let invoice = client.find_invoice("inv-1").await.unwrap();
    let before = backend.count();

    let outcome = client
        .update_kyc(&invoice, Some("9876543210"), Some("abcde9999z"))
        .await
        .unwrap();
    assert!(!outcome.phone_updated);
    assert!(outcome.pan_updated);
    assert_eq!(backend.count(), before + 1);

    let call = backend.last();
    assert_eq!(call.path, "/api/v1/invoices/update-pan/inv-1");
    assert_eq!(call.body, json!({"PAN": "ABCDE9999Z"}));

    let outcome = client
        .update_kyc(&invoice, Some("9876543210"), Some("ABCDE1234F"))
        .await
        .unwrap();
    assert!(!outcome.changed_anything());
    assert_eq!(backend.count(), before + 1);
}

#[tokio::test]
async fn test_kyc_rejects_bad_phone() {
    let (client, backend) = logged_in("ravi@example.com").await;
    let invoice = client.find_invoice("inv-1").await.unwrap();
    let before = backend.count();

    let err = client.update_kyc(&invoice, Some("12345"), None).await.unwrap_err();
    assert!(err.is_validation_error());
    assert_eq!(backend.count(), before);
}

#[tokio::test]
async fn test_pdf_download() {
    let (client, _backend) = logged_in("ravi@example.com").await;

    let bytes = client.invoice_pdf("inv-1").await.unwrap();
    assert!(bytes.starts_with(b"%PDF"));

    let err = client.invoice_pdf("missing").await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound(msg) if msg == "Invoice not found"));
}

#[tokio::test]
async fn test_delete_invoice_rejected_by_backend() {
    let (client, backend) = logged_in("meera@example.com").await;

    let err = client.delete_invoice("locked").await.unwrap_err();
    assert!(matches!(err, ApiError::Rejected(msg) if msg == "Invoice has payments"));

    let ack = client.delete_invoice("inv-1").await.unwrap();
    assert_eq!(ack.message.as_deref(), Some("Invoice deleted"));
    assert_eq!(backend.last().method, Method::DELETE);
}

#[tokio::test]
async fn test_latest_payment() {
    let (client, _backend) = logged_in("ravi@example.com").await;

    let payment = client.latest_payment("inv-1").await.unwrap().unwrap();
    assert_eq!(payment.amount, Money::from_rupees(1_00_000));
    assert_eq!(payment.payment_mode, PaymentMode::Upi);

    assert!(client.latest_payment("inv-none").await.unwrap().is_none());
}

// =============================================================================
// Analytics
// =============================================================================

#[tokio::test]
async fn test_analytics_for_admin() {
    let (client, _backend) = logged_in("meera@example.com").await;

    let snapshot = client.analytics().await.unwrap();
    assert_eq!(snapshot.total_invoices, 2);
    assert_eq!(snapshot.total_billed(), Money::from_rupees(54_87_000));

    let series = client.revenue_summary().await.unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series[1].label(), "16 Dec");
}

// =============================================================================
// Transport
// =============================================================================

#[tokio::test]
async fn test_unreachable_backend_is_connection_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut client = client_for(addr);
    let err = client.login("meera@example.com", "secret").await.unwrap_err();
    assert!(matches!(err, ApiError::Connection(_)));
    assert!(err.is_retryable());
}
