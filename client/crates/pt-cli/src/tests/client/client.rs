//! The 401 interceptor, driven by a scripted transport.

use crate::{ApiRequest, ApiResponse, CliClientResult, Client, ClientError, REFRESH_PATH, Transport, TransportRefresher};

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pt_core::User;
use pt_session::{
    MemorySessionStore, RefreshState, SessionError, SessionListener, SessionManager,
    SessionSettings, SessionStore, TokioClock,
};

/// Replies with queued responses in order and records what was sent.
#[derive(Default)]
struct ScriptedTransport {
    responses: Mutex<VecDeque<ApiResponse>>,
    sent: Mutex<Vec<ApiRequest>>,
    delay: Option<Duration>,
}

impl ScriptedTransport {
    fn replying(responses: &[(u16, &str)]) -> Arc<Self> {
        let transport = Self::default();
        transport.responses.lock().unwrap().extend(responses.iter().map(
            |(status, body)| ApiResponse {
                status: *status,
                body: body.to_string(),
            },
        ));
        Arc::new(transport)
    }

    fn replying_after(delay: Duration, responses: &[(u16, &str)]) -> Arc<Self> {
        let mut transport = Arc::into_inner(Self::replying(responses)).unwrap();
        transport.delay = Some(delay);
        Arc::new(transport)
    }

    fn sent_paths(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|request| request.path.clone())
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &ApiRequest) -> CliClientResult<ApiResponse> {
        self.sent.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ApiResponse {
                status: 500,
                body: String::new(),
            }))
    }

    fn cookie_header(&self) -> Option<String> {
        Some("access_token=fresh".to_string())
    }
}

#[derive(Default)]
struct CountingListener {
    expired: AtomicUsize,
}

impl SessionListener for CountingListener {
    fn session_expired(&self, _user: Option<&User>) {
        self.expired.fetch_add(1, Ordering::SeqCst);
    }
}

struct Fixture {
    client: Client,
    transport: Arc<ScriptedTransport>,
    store: Arc<MemorySessionStore>,
    listener: Arc<CountingListener>,
}

fn fixture(responses: &[(u16, &str)]) -> Fixture {
    fixture_over(ScriptedTransport::replying(responses))
}

fn fixture_over(transport: Arc<ScriptedTransport>) -> Fixture {
    let store = Arc::new(MemorySessionStore::new());
    let listener = Arc::new(CountingListener::default());
    let refresher = Arc::new(TransportRefresher::new(transport.clone(), store.clone()));
    let session = SessionManager::new(
        SessionSettings::default(),
        Arc::new(TokioClock::new()),
        refresher,
        store.clone(),
        listener.clone(),
    );

    Fixture {
        client: Client::new(transport.clone(), session),
        transport,
        store,
        listener,
    }
}

fn user() -> User {
    User {
        id: "u1".to_string(),
        email: "asha@example.com".to_string(),
        name: "Asha".to_string(),
        role: None,
    }
}

#[tokio::test]
async fn given_no_session_when_401_then_plain_api_error_without_refresh() {
    // Given
    let f = fixture(&[(401, r#"{"message":"Invalid credentials"}"#)]);

    // When
    let result = f.client.execute(ApiRequest::post("/auth/login")).await;

    // Then
    let err = result.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.user_message("Login failed"), "Invalid credentials");
    assert_eq!(f.transport.sent_paths(), vec!["/auth/login"]);
    assert_eq!(f.listener.expired.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn given_active_session_when_401_then_refresh_and_replay_once() {
    // Given
    let f = fixture(&[(401, ""), (200, "{}"), (200, "[]")]);
    let session = f.client.session();
    session.start_session(user()).unwrap();
    let first_refresh_at = session.next_refresh_at().unwrap();
    tokio::time::advance(Duration::from_secs(500)).await;

    // When
    let response = f.client.execute(ApiRequest::get("/ledgers")).await.unwrap();

    // Then
    assert_eq!(response.body, "[]");
    assert_eq!(
        f.transport.sent_paths(),
        vec!["/ledgers", REFRESH_PATH, "/ledgers"]
    );
    let rearmed_at = session.next_refresh_at().unwrap();
    assert_eq!(rearmed_at, session.clock().now() + chrono::Duration::seconds(840));
    assert!(rearmed_at > first_refresh_at);
    assert_eq!(
        f.store.load().unwrap().cookies.as_deref(),
        Some("access_token=fresh")
    );
}

#[tokio::test]
async fn given_replayed_request_when_401_again_then_not_retried() {
    // Given
    let f = fixture(&[(401, ""), (200, "{}"), (401, "")]);
    f.client.session().start_session(user()).unwrap();

    // When
    let result = f.client.execute(ApiRequest::get("/ledgers")).await;

    // Then
    assert_eq!(result.unwrap_err().status(), Some(401));
    assert_eq!(f.transport.sent_paths().len(), 3);
    assert!(f.client.session().is_active());
}

#[tokio::test]
async fn given_active_session_when_refresh_fails_then_expired_once() {
    // Given
    let f = fixture(&[(401, ""), (401, ""), (401, "")]);
    f.client.session().start_session(user()).unwrap();

    // When
    let result = f.client.execute(ApiRequest::get("/ledgers")).await;

    // Then
    assert!(matches!(result, Err(ClientError::SessionExpired { .. })));
    assert_eq!(f.listener.expired.load(Ordering::SeqCst), 1);
    assert!(!f.client.session().is_active());
    assert_eq!(f.store.load().unwrap().user, None);

    // A later 401 without a session is an ordinary error
    let later = f.client.execute(ApiRequest::get("/ledgers")).await;
    assert!(matches!(later, Err(ClientError::Api { .. })));
    assert_eq!(f.listener.expired.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn given_active_session_when_refresh_endpoint_401_then_expired_without_retry() {
    // Given
    let f = fixture(&[(401, "")]);
    f.client.session().start_session(user()).unwrap();

    // When
    let result = f.client.execute(ApiRequest::post(REFRESH_PATH)).await;

    // Then
    assert!(matches!(result, Err(ClientError::SessionExpired { .. })));
    assert_eq!(f.transport.sent_paths(), vec![REFRESH_PATH]);
    assert_eq!(f.listener.expired.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn given_active_session_when_manual_refresh_then_timer_rearmed() {
    // Given
    let f = fixture(&[(200, "{}")]);
    let session = f.client.session();
    session.start_session(user()).unwrap();
    tokio::time::advance(Duration::from_secs(500)).await;

    // When
    f.client.refresh().await.unwrap();

    // Then
    assert_eq!(f.transport.sent_paths(), vec![REFRESH_PATH]);
    assert_eq!(
        session.next_refresh_at(),
        Some(session.clock().now() + chrono::Duration::seconds(840))
    );
    assert_eq!(session.refresh_state(), RefreshState::Idle);
    assert_eq!(
        f.store.load().unwrap().cookies.as_deref(),
        Some("access_token=fresh")
    );
}

#[tokio::test(start_paused = true)]
async fn given_manual_refresh_in_flight_when_observed_then_state_is_refreshing() {
    // Given
    let Fixture { client, .. } = fixture_over(ScriptedTransport::replying_after(
        Duration::from_secs(5),
        &[(200, "{}")],
    ));
    client.session().start_session(user()).unwrap();
    let client = Arc::new(client);
    let task_client = Arc::clone(&client);

    // When
    let task = tokio::spawn(async move { task_client.refresh().await });
    tokio::time::sleep(Duration::from_secs(1)).await;

    // Then
    assert_eq!(client.session().refresh_state(), RefreshState::Refreshing);
    task.await.unwrap().unwrap();
    assert_eq!(client.session().refresh_state(), RefreshState::Idle);
}

#[tokio::test]
async fn given_active_session_when_manual_refresh_fails_then_expired_once() {
    // Given
    let f = fixture(&[(401, "")]);
    f.client.session().start_session(user()).unwrap();

    // When
    let result = f.client.refresh().await;

    // Then
    assert!(matches!(result, Err(ClientError::SessionExpired { .. })));
    assert_eq!(f.transport.sent_paths(), vec![REFRESH_PATH]);
    assert_eq!(f.listener.expired.load(Ordering::SeqCst), 1);
    assert!(!f.client.session().is_active());
}

#[tokio::test]
async fn given_no_session_when_manual_refresh_fails_then_refresh_error_without_expiry() {
    // Given
    let f = fixture(&[(401, "")]);

    // When
    let result = f.client.refresh().await;

    // Then
    assert!(matches!(
        result,
        Err(ClientError::Session(SessionError::RefreshFailed { .. }))
    ));
    assert_eq!(f.listener.expired.load(Ordering::SeqCst), 0);
    assert!(!f.client.session().is_scheduled());
}

#[tokio::test(start_paused = true)]
async fn given_recent_reset_request_when_requested_again_then_refused_until_cooldown_ends() {
    // Given
    let f = fixture(&[(200, "Code sent"), (200, "Code sent")]);
    f.client
        .request_password_reset("asha@example.com")
        .await
        .unwrap();
    tokio::time::advance(Duration::from_millis(30_500)).await;

    // When
    let refused = f.client.request_password_reset("asha@example.com").await;

    // Then
    let err = refused.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert_eq!(
        err.user_message("Failed to send reset code"),
        "Please wait 30s before requesting another code"
    );
    assert_eq!(f.transport.sent_paths().len(), 1);

    tokio::time::advance(Duration::from_secs(30)).await;
    f.client
        .request_password_reset("asha@example.com")
        .await
        .unwrap();
    assert_eq!(f.transport.sent_paths().len(), 2);
}
