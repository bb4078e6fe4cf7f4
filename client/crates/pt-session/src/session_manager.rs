use crate::{
    Clock, RefreshState, RefreshTrigger, SessionError, SessionListener, SessionRefresher,
    SessionResult, SessionSettings, SessionStore, StoredSession,
};

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use log::{debug, error, info, warn};
use pt_core::User;
use tokio::task::JoinHandle;

/// Owns the client session: the cached user, the proactive refresh timer and
/// the refresh state machine.
///
/// Cloning is cheap and every clone drives the same session. Methods that arm
/// the timer spawn onto the current tokio runtime and must be called from
/// within one.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

struct Inner {
    settings: SessionSettings,
    clock: Arc<dyn Clock>,
    refresher: Arc<dyn SessionRefresher>,
    store: Arc<dyn SessionStore>,
    listener: Arc<dyn SessionListener>,
    state: Mutex<SessionState>,
    /// Number of refresh calls currently awaiting the backend
    in_flight: AtomicUsize,
    /// Serializes refreshes when coalescing; holds the last outcome
    refresh_gate: tokio::sync::Mutex<Option<Result<(), String>>>,
    /// Bumped each time a coalesced refresh completes
    refresh_generation: AtomicU64,
}

struct SessionState {
    user: Option<User>,
    active: bool,
    refresh_state: RefreshState,
    timer: Option<RefreshTimer>,
    timer_generation: u64,
}

struct RefreshTimer {
    handle: JoinHandle<()>,
    fires_at: DateTime<Utc>,
    generation: u64,
}

impl Drop for Inner {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(timer) = state.timer.take() {
            timer.handle.abort();
        }
    }
}

/// Keeps `in_flight` and the refresh state honest even if a refresh future is
/// dropped before completing.
struct InFlightGuard<'a> {
    manager: &'a SessionManager,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let remaining = self.manager.inner.in_flight.fetch_sub(1, Ordering::SeqCst) - 1;
        if remaining == 0 {
            self.manager.set_refresh_state(RefreshState::Idle);
        }
    }
}

impl SessionManager {
    pub fn new(
        settings: SessionSettings,
        clock: Arc<dyn Clock>,
        refresher: Arc<dyn SessionRefresher>,
        store: Arc<dyn SessionStore>,
        listener: Arc<dyn SessionListener>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                settings,
                clock,
                refresher,
                store,
                listener,
                state: Mutex::new(SessionState {
                    user: None,
                    active: false,
                    refresh_state: RefreshState::Idle,
                    timer: None,
                    timer_generation: 0,
                }),
                in_flight: AtomicUsize::new(0),
                refresh_gate: tokio::sync::Mutex::new(None),
                refresh_generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.inner.settings
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.inner.clock)
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Proactive timer
    // =========================================================================

    /// Arm the refresh timer for a token that expires in `expires_in`.
    ///
    /// Any pending timer is cancelled first. The timer fires `refresh_lead`
    /// before expiry, or immediately if the token expires sooner than that.
    pub fn schedule(&self, expires_in: Duration) {
        let delay = expires_in.saturating_sub(self.inner.settings.refresh_lead);
        let fires_at = TimeDelta::from_std(delay)
            .ok()
            .and_then(|delta| self.inner.clock.now().checked_add_signed(delta))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let sleep = self.inner.clock.sleep(delay);

        let mut state = self.state();
        if let Some(timer) = state.timer.take() {
            timer.handle.abort();
        }
        state.timer_generation += 1;
        let generation = state.timer_generation;

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let handle = tokio::spawn(async move {
            sleep.await;
            if let Some(inner) = weak.upgrade() {
                SessionManager { inner }.on_timer_fired(generation).await;
            }
        });

        state.timer = Some(RefreshTimer {
            handle,
            fires_at,
            generation,
        });

        debug!(
            "Token refresh armed for {fires_at} ({}s from now)",
            delay.as_secs()
        );
    }

    /// Disarm the refresh timer.
    pub fn cancel(&self) {
        let mut state = self.state();
        state.timer_generation += 1;
        if let Some(timer) = state.timer.take() {
            timer.handle.abort();
            debug!("Token refresh timer cancelled");
        }
    }

    pub fn next_refresh_at(&self) -> Option<DateTime<Utc>> {
        self.state().timer.as_ref().map(|timer| timer.fires_at)
    }

    pub fn is_scheduled(&self) -> bool {
        self.state().timer.is_some()
    }

    async fn on_timer_fired(&self, generation: u64) {
        {
            let mut state = self.state();
            if state.timer.as_ref().map(|timer| timer.generation) != Some(generation) {
                return;
            }
            // Detach; dropping the handle does not abort this task
            state.timer = None;
        }

        info!("Proactive token refresh firing");

        match self.refresh(RefreshTrigger::Proactive).await {
            Ok(()) => {
                let superseded = self.state().timer_generation != generation;
                if superseded {
                    debug!("Timer was re-armed or cancelled during refresh, not re-arming");
                } else {
                    self.schedule(self.inner.settings.refresh_interval);
                }
            }
            Err(e) => {
                warn!("Proactive token refresh failed: {e}");
                self.expire();
            }
        }
    }

    // =========================================================================
    // Refresh state machine
    // =========================================================================

    pub fn refresh_state(&self) -> RefreshState {
        self.state().refresh_state
    }

    fn set_refresh_state(&self, next: RefreshState) {
        let mut state = self.state();
        if state.refresh_state != next {
            debug!("Refresh state {:?} -> {:?}", state.refresh_state, next);
            state.refresh_state = next;
        }
    }

    /// Refresh the access token.
    ///
    /// Overlapping refreshes are logged. With `coalesce_refreshes` set, a
    /// caller that finds a refresh in flight waits for it and reuses its
    /// outcome; otherwise both calls reach the backend.
    pub async fn refresh(&self, trigger: RefreshTrigger) -> SessionResult<()> {
        if self.inner.settings.coalesce_refreshes {
            self.refresh_coalesced(trigger).await
        } else {
            self.run_refresh(trigger).await
        }
    }

    async fn refresh_coalesced(&self, trigger: RefreshTrigger) -> SessionResult<()> {
        let observed = self.inner.refresh_generation.load(Ordering::SeqCst);

        let mut last_outcome = match self.inner.refresh_gate.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                info!("{trigger} refresh waiting on the refresh already in flight");
                self.inner.refresh_gate.lock().await
            }
        };

        if self.inner.refresh_generation.load(Ordering::SeqCst) != observed {
            debug!("{trigger} refresh reusing the outcome of the one it waited on");
            return match last_outcome.as_ref() {
                Some(Err(message)) => Err(SessionError::refresh_failed(message.clone())),
                Some(Ok(())) | None => Ok(()),
            };
        }

        let result = self.run_refresh(trigger).await;
        *last_outcome = Some(result.as_ref().map(|_| ()).map_err(|e| e.to_string()));
        self.inner.refresh_generation.fetch_add(1, Ordering::SeqCst);
        result
    }

    async fn run_refresh(&self, trigger: RefreshTrigger) -> SessionResult<()> {
        let overlapping = self.inner.in_flight.fetch_add(1, Ordering::SeqCst);
        let _guard = InFlightGuard { manager: self };

        if overlapping > 0 {
            warn!("{trigger} refresh overlaps {overlapping} refresh(es) already in flight");
        }
        self.set_refresh_state(trigger.state());

        let result = self.inner.refresher.refresh().await;
        match &result {
            Ok(()) => info!("Token refreshed ({trigger})"),
            Err(e) => warn!("Token refresh failed ({trigger}): {e}"),
        }
        result
    }

    // =========================================================================
    // Session lifecycle
    // =========================================================================

    pub fn is_active(&self) -> bool {
        self.state().active
    }

    pub fn current_user(&self) -> Option<User> {
        self.state().user.clone()
    }

    /// The logged-in user, or [`SessionError::Expired`] without a session.
    #[track_caller]
    pub fn require_user(&self) -> SessionResult<User> {
        match self.current_user() {
            Some(user) => Ok(user),
            None => Err(SessionError::expired()),
        }
    }

    /// Cache `user` as logged in and arm the proactive refresh.
    pub fn start_session(&self, user: User) -> SessionResult<()> {
        let mut stored = self.inner.store.load()?;
        stored.user = Some(user.clone());
        self.inner.store.save(&stored)?;

        info!("Session started for {}", user.email);
        {
            let mut state = self.state();
            state.user = Some(user);
            state.active = true;
        }

        self.schedule(self.inner.settings.refresh_interval);
        Ok(())
    }

    /// Restore a cached session, arming the proactive refresh if one exists.
    pub fn resume(&self) -> SessionResult<Option<User>> {
        let stored = self.inner.store.load()?;
        let Some(user) = stored.user else {
            debug!("No cached session to resume");
            return Ok(None);
        };

        info!("Resumed session for {}", user.email);
        {
            let mut state = self.state();
            state.user = Some(user.clone());
            state.active = true;
        }

        self.schedule(self.inner.settings.refresh_interval);
        Ok(Some(user))
    }

    /// Log out: disarm the timer and forget the cached session.
    pub fn end_session(&self) -> SessionResult<()> {
        self.cancel();
        let user = {
            let mut state = self.state();
            state.active = false;
            state.user.take()
        };

        if let Some(user) = &user {
            info!("Session ended for {}", user.email);
        }
        self.clear_stored_session()
    }

    /// The session can no longer be refreshed: disarm, clear, and notify the
    /// listener. Repeated calls for the same session are no-ops for the
    /// listener.
    pub fn expire(&self) {
        self.cancel();
        let (was_active, user) = {
            let mut state = self.state();
            let was_active = std::mem::replace(&mut state.active, false);
            (was_active, state.user.take())
        };

        if let Err(e) = self.clear_stored_session() {
            error!("Failed to clear expired session: {e}");
        }

        if was_active {
            warn!("Session expired, login required");
            self.inner.listener.session_expired(user.as_ref());
        }
    }

    /// Drop user and cookies from the store, keeping a pending reset email.
    fn clear_stored_session(&self) -> SessionResult<()> {
        let stored = self.inner.store.load()?;
        match stored.reset_email {
            Some(reset_email) => self.inner.store.save(&StoredSession {
                reset_email: Some(reset_email),
                reset_requested_at: stored.reset_requested_at,
                ..StoredSession::default()
            }),
            None => self.inner.store.clear(),
        }
    }

    // =========================================================================
    // Persisted extras
    // =========================================================================

    /// Cookie header saved by a previous run.
    pub fn stored_cookies(&self) -> SessionResult<Option<String>> {
        Ok(self.inner.store.load()?.cookies)
    }

    /// Save the transport's cookies while a session is active.
    pub fn persist_cookies(&self, cookies: Option<String>) -> SessionResult<()> {
        if !self.is_active() {
            return Ok(());
        }

        let mut stored = self.inner.store.load()?;
        if stored.cookies == cookies {
            return Ok(());
        }
        stored.cookies = cookies;
        self.inner.store.save(&stored)
    }

    pub fn reset_email(&self) -> SessionResult<Option<String>> {
        Ok(self.inner.store.load()?.reset_email)
    }

    /// Remember the email a reset code was just requested for, starting its
    /// resend cooldown.
    pub fn remember_reset_email(&self, email: &str) -> SessionResult<()> {
        let mut stored = self.inner.store.load()?;
        stored.reset_email = Some(email.to_string());
        stored.reset_requested_at = Some(self.inner.clock.now());
        self.inner.store.save(&stored)
    }

    /// Time left before another reset code may be requested for `email`.
    pub fn reset_resend_wait(&self, email: &str) -> SessionResult<Option<Duration>> {
        let stored = self.inner.store.load()?;
        let requested_at = match (stored.reset_email, stored.reset_requested_at) {
            (Some(pending), Some(requested_at)) if pending.eq_ignore_ascii_case(email) => {
                requested_at
            }
            _ => return Ok(None),
        };

        // A request stamped in the future counts as just made
        let elapsed = (self.inner.clock.now() - requested_at)
            .to_std()
            .unwrap_or(Duration::ZERO);
        Ok(self
            .inner
            .settings
            .reset_resend_cooldown
            .checked_sub(elapsed)
            .filter(|left| !left.is_zero()))
    }

    pub fn clear_reset_email(&self) -> SessionResult<()> {
        let mut stored = self.inner.store.load()?;
        stored.reset_requested_at = None;
        if stored.reset_email.take().is_none() {
            return Ok(());
        }
        if stored.is_empty() {
            self.inner.store.clear()
        } else {
            self.inner.store.save(&stored)
        }
    }
}
