
use crate::{
    MemorySessionStore, SessionError, SessionListener, SessionManager, SessionRefresher,
    SessionResult, SessionSettings, TokioClock,
};

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use pt_core::User;

pub(crate) fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 9, 0, 0).unwrap()
}

pub(crate) fn user() -> User {
    User {
        id: "u1".to_string(),
        email: "asha@example.com".to_string(),
        name: "Asha".to_string(),
        role: None,
    }
}

/// Refresher that counts calls and succeeds or fails on demand.
#[derive(Default)]
pub(crate) struct ScriptedRefresher {
    calls: AtomicUsize,
    fail: AtomicBool,
    delay: Option<Duration>,
}

impl ScriptedRefresher {
    pub(crate) fn succeeding() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn failing() -> Arc<Self> {
        let refresher = Self::default();
        refresher.fail.store(true, Ordering::SeqCst);
        Arc::new(refresher)
    }

    pub(crate) fn slow(delay: Duration, fail: bool) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail: AtomicBool::new(fail),
            delay: Some(delay),
        })
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionRefresher for ScriptedRefresher {
    async fn refresh(&self) -> SessionResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            Err(SessionError::refresh_failed("refresh token rejected"))
        } else {
            Ok(())
        }
    }
}

/// Listener that records expiry notifications.
#[derive(Default)]
pub(crate) struct RecordingListener {
    expired: AtomicUsize,
    last_user: Mutex<Option<User>>,
}

impl RecordingListener {
    pub(crate) fn expired_count(&self) -> usize {
        self.expired.load(Ordering::SeqCst)
    }

    pub(crate) fn last_user(&self) -> Option<User> {
        self.last_user.lock().unwrap().clone()
    }
}

impl SessionListener for RecordingListener {
    fn session_expired(&self, user: Option<&User>) {
        self.expired.fetch_add(1, Ordering::SeqCst);
        *self.last_user.lock().unwrap() = user.cloned();
    }
}

pub(crate) struct Harness {
    pub(crate) manager: SessionManager,
    pub(crate) refresher: Arc<ScriptedRefresher>,
    pub(crate) store: Arc<MemorySessionStore>,
    pub(crate) listener: Arc<RecordingListener>,
}

/// Build a manager with default timing (900 s interval, 60 s lead) on a
/// clock starting at [`start_time`]. Must run inside a tokio runtime.
pub(crate) fn harness(refresher: Arc<ScriptedRefresher>) -> Harness {
    harness_with(refresher, SessionSettings::default())
}

pub(crate) fn harness_with(refresher: Arc<ScriptedRefresher>, settings: SessionSettings) -> Harness {
    let store = Arc::new(MemorySessionStore::new());
    let listener = Arc::new(RecordingListener::default());
    let manager = SessionManager::new(
        settings,
        Arc::new(TokioClock::starting_at(start_time())),
        refresher.clone(),
        store.clone(),
        listener.clone(),
    );

    Harness {
        manager,
        refresher,
        store,
        listener,
    }
}

pub(crate) async fn advance(secs: u64) {
    tokio::time::sleep(Duration::from_secs(secs)).await;
}
