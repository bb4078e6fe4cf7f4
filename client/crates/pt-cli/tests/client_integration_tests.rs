//! Integration tests for the paytrack client against a wiremock backend

use pt_cli::{Client, ClientError, ReqwestTransport, Transport, TransportRefresher};
use pt_core::{DateRange, PaymentForm, User};
use pt_session::{
    FileSessionStore, MemorySessionStore, SessionListener, SessionManager, SessionSettings,
    SessionStore, StoredSession, TokioClock,
};

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path, query_param},
};

#[derive(Default)]
struct CountingListener {
    expired: AtomicUsize,
}

impl SessionListener for CountingListener {
    fn session_expired(&self, _user: Option<&User>) {
        self.expired.fetch_add(1, Ordering::SeqCst);
    }
}

impl CountingListener {
    fn count(&self) -> usize {
        self.expired.load(Ordering::SeqCst)
    }
}

fn asha() -> User {
    User {
        id: "u1".to_string(),
        email: "asha@example.com".to_string(),
        name: "Asha".to_string(),
        role: None,
    }
}

fn logged_in_store() -> Arc<MemorySessionStore> {
    Arc::new(MemorySessionStore::with_session(StoredSession {
        user: Some(asha()),
        ..StoredSession::default()
    }))
}

fn client_for(
    server: &MockServer,
    store: Arc<dyn SessionStore>,
) -> (Client, Arc<CountingListener>) {
    let cookies = store.load().unwrap().cookies;
    let transport: Arc<dyn Transport> = Arc::new(
        ReqwestTransport::new(&server.uri(), Duration::from_secs(5), cookies.as_deref()).unwrap(),
    );
    let listener = Arc::new(CountingListener::default());
    let session = SessionManager::new(
        SessionSettings::default(),
        Arc::new(TokioClock::new()),
        Arc::new(TransportRefresher::new(transport.clone(), store.clone())),
        store,
        listener.clone(),
    );

    (Client::new(transport, session), listener)
}

/// Client over `store` with the cached session resumed.
fn resumed_client(
    server: &MockServer,
    store: Arc<dyn SessionStore>,
) -> (Client, Arc<CountingListener>) {
    let (client, listener) = client_for(server, store);
    client.session().resume().unwrap();
    (client, listener)
}

#[tokio::test]
async fn test_login_success_starts_session_and_saves_cookies() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_partial_json(json!({
            "email": "asha@example.com",
            "password": "secret"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "access_token=abc; Path=/; HttpOnly")
                .set_body_json(json!({
                    "user": { "id": 1, "email": "asha@example.com", "name": "Asha" }
                })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemorySessionStore::new());
    let (client, _) = client_for(&mock_server, store.clone());

    let response = client.login(" asha@example.com ", "secret").await.unwrap();

    let user = response.user.unwrap();
    assert_eq!(user.id, "1");
    assert!(client.session().is_active());
    assert!(client.session().is_scheduled());

    let stored = store.load().unwrap();
    assert_eq!(stored.user, Some(user));
    assert_eq!(stored.cookies.as_deref(), Some("access_token=abc"));
}

#[tokio::test]
async fn test_login_rejected_is_plain_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (client, listener) = client_for(&mock_server, Arc::new(MemorySessionStore::new()));

    let err = client.login("asha@example.com", "wrong").await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(err.user_message("Login failed"), "Invalid credentials");
    assert!(!client.session().is_active());
    assert_eq!(listener.count(), 0);
}

#[tokio::test]
async fn test_invalid_email_sends_nothing() {
    let mock_server = MockServer::start().await;
    let (client, _) = client_for(&mock_server, Arc::new(MemorySessionStore::new()));

    let err = client.login("not-an-email", "secret").await.unwrap_err();

    assert!(matches!(err, ClientError::Validation(_)));
    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_unauthorized_request_refreshes_and_replays() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ledgers"))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/ledgers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, listener) = resumed_client(&mock_server, logged_in_store());

    let payments = client.fetch_ledgers(&DateRange::all()).await.unwrap();

    assert!(payments.is_empty());
    assert!(client.session().is_active());
    assert_eq!(listener.count(), 0);
}

#[tokio::test]
async fn test_failed_refresh_expires_session_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ledgers"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = logged_in_store();
    let (client, listener) = resumed_client(&mock_server, store.clone());

    let err = client.fetch_ledgers(&DateRange::all()).await.unwrap_err();

    assert!(matches!(err, ClientError::SessionExpired { .. }));
    assert_eq!(
        err.user_message("Failed to load dashboard data"),
        "Your session has expired. Please log in again."
    );
    assert_eq!(listener.count(), 1);
    assert!(!client.session().is_active());
    assert!(!client.session().is_scheduled());
    assert_eq!(store.load().unwrap().user, None);
}

#[tokio::test]
async fn test_fetch_ledgers_sends_date_range() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ledgers"))
        .and(query_param("startDate", "2025-06-01"))
        .and(query_param("endDate", "2025-06-15"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 10,
                "payerId": 2,
                "payeeId": "u1",
                "amount": 500.0,
                "timestamp": "2025-06-14T10:00:00Z",
                "description": "Rent share",
                "payer": { "id": 2, "name": "Bob", "email": "bob@example.com" }
            }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, _) = resumed_client(&mock_server, logged_in_store());
    let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
    let range = DateRange::custom("2025-06-01", "2025-06-15", today).unwrap();

    let payments = client.fetch_ledgers(&range).await.unwrap();

    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].id, "10");
    assert_eq!(payments[0].payer_id, "2");
    assert_eq!(payments[0].payer.as_ref().unwrap().name, "Bob");
}

#[tokio::test]
async fn test_list_beneficiaries_requires_session() {
    let mock_server = MockServer::start().await;
    let (client, _) = client_for(&mock_server, Arc::new(MemorySessionStore::new()));

    let err = client.list_beneficiaries().await.unwrap_err();

    assert_eq!(
        err.user_message("Failed to load beneficiaries"),
        "Your session has expired. Please log in again."
    );
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_send_payment_posts_ledger_for_beneficiary() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/beneficiary/payer"))
        .and(query_param("payerId", "u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 3, "payeeEmail": "carol@example.com", "payeeAlias": "Carol" },
            { "id": 7, "payeeEmail": "bob@example.com", "payeeAlias": "Bob" }
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/ledgers"))
        .and(body_partial_json(json!({
            "payerId": "u1",
            "payeeId": "7",
            "amount": 250.5,
            "description": "Dinner",
            "timestamp": "2025-06-15T08:30:00Z"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 99,
            "payerId": "u1",
            "payeeId": "7",
            "amount": 250.5,
            "timestamp": "2025-06-15T08:30:00Z",
            "description": "Dinner"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (client, _) = resumed_client(&mock_server, logged_in_store());
    let form = PaymentForm {
        amount: "250.50".to_string(),
        description: " Dinner ".to_string(),
        timestamp: Some("2025-06-15T08:30".to_string()),
        category: None,
    };
    let now = Utc.with_ymd_and_hms(2025, 6, 15, 9, 0, 0).unwrap();

    let record = client.send_payment(7, form, &Utc, now).await.unwrap();

    assert_eq!(record.id, "99");
    assert_eq!(record.amount, 250.5);
}

#[tokio::test]
async fn test_send_payment_unknown_beneficiary_records_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/beneficiary/payer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/ledgers"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (client, _) = resumed_client(&mock_server, logged_in_store());
    let form = PaymentForm {
        amount: "10".to_string(),
        description: "Tea".to_string(),
        ..PaymentForm::default()
    };

    let err = client
        .send_payment(42, form, &Utc, Utc::now())
        .await
        .unwrap_err();

    assert_eq!(err.user_message("Failed to create payment"), "No beneficiary with id 42");
}

#[tokio::test]
async fn test_password_reset_flow_remembers_email() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/password-reset/request"))
        .and(body_partial_json(json!({ "email": "asha@example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_string("Reset code sent"))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/password-reset/verify"))
        .and(body_partial_json(json!({ "email": "asha@example.com", "otp": 123456 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Verified" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = Arc::new(MemorySessionStore::new());
    let (client, _) = client_for(&mock_server, store.clone());

    let requested = client.request_password_reset("asha@example.com").await.unwrap();
    assert_eq!(requested.message, "Reset code sent");
    assert_eq!(
        store.load().unwrap().reset_email.as_deref(),
        Some("asha@example.com")
    );

    let verified = client.verify_password_reset(None, "123-456").await.unwrap();
    assert_eq!(verified.message, "Verified");
    assert_eq!(store.load().unwrap().reset_email, None);
}

#[tokio::test]
async fn test_logout_clears_session_even_when_backend_fails() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let store = logged_in_store();
    let (client, listener) = resumed_client(&mock_server, store.clone());

    let result = client.logout().await;

    assert_eq!(result.unwrap_err().status(), Some(500));
    assert!(!client.session().is_active());
    assert_eq!(store.load().unwrap().user, None);
    assert_eq!(listener.count(), 0);
}

#[tokio::test]
async fn test_cookies_survive_restart_through_session_file() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let session_file = dir.path().join("session.json");

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "access_token=abc; Path=/")
                .set_body_json(json!({
                    "user": { "id": "u1", "email": "asha@example.com", "name": "Asha" }
                })),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/ledgers"))
        .and(header("cookie", "access_token=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    {
        let (client, _) = client_for(
            &mock_server,
            Arc::new(FileSessionStore::new(session_file.clone())),
        );
        client.login("asha@example.com", "secret").await.unwrap();
    }

    let (client, _) = resumed_client(&mock_server, Arc::new(FileSessionStore::new(session_file)));

    assert_eq!(client.session().current_user(), Some(asha()));
    client.fetch_ledgers(&DateRange::all()).await.unwrap();
}
