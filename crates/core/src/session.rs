//! Session store: token persistence, start-up restore and automatic logout

use crate::clock::Clock;
use crate::config::SessionConfig;
use crate::error::{CoreError, CoreResult, ErrorContext};
use crate::storage::SessionStorage;
use crate::timer::{TimerHandle, TimerScheduler};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, info, warn};

/// Authentication session
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: Option<String>,
    pub expiration_time: Option<DateTime<Utc>>,
}

impl Session {
    pub fn is_logged_in(&self) -> bool {
        self.token.as_deref().is_some_and(|token| !token.is_empty())
    }
}

/// 9999-12-31T23:59:59.999Z, the last instant with a four-digit year
const LATEST_EXPIRATION_MS: i64 = 253_402_300_799_999;

/// Latest expiration time that still parses back after being persisted
pub fn latest_expiration() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(LATEST_EXPIRATION_MS).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Serialize an expiration time the way it is persisted
pub fn format_expiration(expiration_time: DateTime<Utc>) -> String {
    expiration_time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a persisted expiration time
pub fn parse_expiration(raw: &str) -> CoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| CoreError::invalid_expiration(raw, err.to_string()))
}

struct PendingLogout {
    generation: u64,
    handle: Box<dyn TimerHandle>,
}

#[derive(Default)]
struct State {
    session: Session,
    timer: Option<PendingLogout>,
}

type Listener = Rc<dyn Fn(&Session)>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

struct Inner {
    config: SessionConfig,
    storage: Rc<dyn SessionStorage>,
    clock: Rc<dyn Clock>,
    scheduler: Rc<dyn TimerScheduler>,
    state: RefCell<State>,
    generation: Cell<u64>,
    listeners: RefCell<Listeners>,
}

/// Persisted fields as read back from storage
enum Persisted {
    Empty,
    Partial,
    Complete { token: String, expiration: String },
}

/// Shared handle to the session store.
///
/// Clones refer to the same store. The store lives on the UI thread only and
/// owns at most one pending automatic-logout timer.
#[derive(Clone)]
pub struct SessionStore {
    inner: Rc<Inner>,
}

impl SessionStore {
    /// Build the store and restore any persisted session.
    ///
    /// A persisted session is discarded (and its storage cleared) when it is
    /// incomplete, when its expiration cannot be parsed, or when its
    /// remaining validity is at or below `config.restore_threshold()`.
    pub fn restore(
        config: SessionConfig,
        storage: Rc<dyn SessionStorage>,
        clock: Rc<dyn Clock>,
        scheduler: Rc<dyn TimerScheduler>,
    ) -> Self {
        let store = Self {
            inner: Rc::new(Inner {
                config,
                storage,
                clock,
                scheduler,
                state: RefCell::default(),
                generation: Cell::new(0),
                listeners: RefCell::default(),
            }),
        };

        match store.read_persisted() {
            Persisted::Empty => debug!("No stored session"),
            Persisted::Partial => {
                warn!("Stored session is incomplete; clearing it");
                store.clear_persisted();
            }
            Persisted::Complete { token, expiration } => match parse_expiration(&expiration) {
                Ok(expiration_time) => store.restore_session(token, expiration_time),
                Err(err) => {
                    warn!(error = %err, "Stored session has an unreadable expiration time; clearing it");
                    store.clear_persisted();
                }
            },
        }

        store
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// Snapshot of the current session
    pub fn session(&self) -> Session {
        self.inner.state.borrow().session.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.inner.state.borrow().session.token.clone()
    }

    pub fn expiration_time(&self) -> Option<DateTime<Utc>> {
        self.inner.state.borrow().session.expiration_time
    }

    pub fn is_logged_in(&self) -> bool {
        self.inner.state.borrow().session.is_logged_in()
    }

    /// Time left before the current session expires
    pub fn remaining(&self) -> Option<Duration> {
        self.expiration_time()
            .map(|expiration_time| expiration_time - self.inner.clock.now())
    }

    /// Whether an automatic logout is currently armed
    pub fn has_pending_logout(&self) -> bool {
        self.inner.state.borrow().timer.is_some()
    }

    /// Start a session, persist it and arm the automatic logout.
    ///
    /// Any previously armed logout timer is cancelled first.
    pub fn login(&self, token: impl Into<String>, expiration_time: DateTime<Utc>) {
        let token = token.into();
        let latest = latest_expiration();
        let expiration_time = if expiration_time > latest {
            warn!(requested = %expiration_time, "Expiration time past year 9999; clamping");
            latest
        } else {
            expiration_time
        };
        self.persist(&token, expiration_time);

        self.inner.state.borrow_mut().session = Session {
            token: Some(token),
            expiration_time: Some(expiration_time),
        };
        self.schedule_logout(expiration_time);

        info!(
            expires_at = %format_expiration(expiration_time),
            "Session started"
        );
        self.notify();
    }

    /// Start a session that expires `lifetime` from now
    pub fn login_for(&self, token: impl Into<String>, lifetime: Duration) {
        let expiration_time = self
            .inner
            .clock
            .now()
            .checked_add_signed(lifetime)
            .unwrap_or_else(|| {
                if lifetime < Duration::zero() {
                    DateTime::<Utc>::MIN_UTC
                } else {
                    latest_expiration()
                }
            });
        self.login(token, expiration_time);
    }

    /// End the session. Safe to call when already logged out.
    pub fn logout(&self) {
        self.cancel_timer();
        self.clear_persisted();

        let previous = std::mem::take(&mut self.inner.state.borrow_mut().session);
        if previous == Session::default() {
            debug!("Logout requested without an active session");
            return;
        }

        info!("Session ended");
        self.notify();
    }

    /// Register a listener called with the new session after every change.
    /// The listener stays registered until the returned guard is dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Session) + 'static,
    {
        let listener: Listener = Rc::new(listener);
        let mut listeners = self.inner.listeners.borrow_mut();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, listener));

        Subscription {
            id,
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn restore_session(&self, token: String, expiration_time: DateTime<Utc>) {
        let remaining = expiration_time - self.inner.clock.now();
        if remaining <= self.inner.config.restore_threshold() {
            info!(
                remaining_ms = remaining.num_milliseconds(),
                "Stored session expired; clearing it"
            );
            self.clear_persisted();
            return;
        }

        self.inner.state.borrow_mut().session = Session {
            token: Some(token),
            expiration_time: Some(expiration_time),
        };
        self.schedule_logout(expiration_time);
        info!(
            remaining_ms = remaining.num_milliseconds(),
            "Restored stored session"
        );
    }

    fn read_persisted(&self) -> Persisted {
        let config = &self.inner.config;
        let read = |key: &str| match self.inner.storage.get_item(key) {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = %err, "Failed to read session storage");
                None
            }
        };

        match (read(&config.token_key), read(&config.expiration_key)) {
            (None, None) => Persisted::Empty,
            (Some(token), Some(expiration)) => Persisted::Complete { token, expiration },
            _ => Persisted::Partial,
        }
    }

    fn persist(&self, token: &str, expiration_time: DateTime<Utc>) {
        let config = &self.inner.config;
        let storage = &self.inner.storage;

        let result = storage
            .set_item(&config.token_key, token)
            .and_then(|()| {
                storage.set_item(&config.expiration_key, &format_expiration(expiration_time))
            })
            .with_context_str("Failed to persist session");

        if let Err(err) = result {
            // Never leave one field behind without the other
            warn!(error = %err, "Session will not survive a reload");
            self.clear_persisted();
        }
    }

    fn clear_persisted(&self) {
        let config = &self.inner.config;
        for key in [&config.token_key, &config.expiration_key] {
            if let Err(err) = self.inner.storage.remove_item(key) {
                warn!(key = %key, error = %err, "Failed to clear session storage");
            }
        }
    }

    fn schedule_logout(&self, expiration_time: DateTime<Utc>) {
        self.cancel_timer();

        let remaining = expiration_time - self.inner.clock.now();
        let delay = remaining
            .max(Duration::zero())
            .min(self.inner.config.max_timer_delay());
        let generation = self.inner.generation.get() + 1;
        self.inner.generation.set(generation);

        let weak = Rc::downgrade(&self.inner);
        let handle = self.inner.scheduler.schedule(
            delay.to_std().unwrap_or_default(),
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    SessionStore { inner }.on_timer(generation);
                }
            }),
        );

        debug!(generation, delay_ms = delay.num_milliseconds(), "Armed logout timer");
        self.inner.state.borrow_mut().timer = Some(PendingLogout { generation, handle });
    }

    fn cancel_timer(&self) {
        let pending = self.inner.state.borrow_mut().timer.take();
        if let Some(pending) = pending {
            debug!(generation = pending.generation, "Cancelled logout timer");
            pending.handle.cancel();
        }
    }

    fn on_timer(&self, generation: u64) {
        let expiration_time = {
            let mut state = self.inner.state.borrow_mut();
            match &state.timer {
                Some(pending) if pending.generation == generation => {}
                _ => {
                    debug!(generation, "Ignoring stale logout timer");
                    return;
                }
            }
            state.timer = None;
            state.session.expiration_time
        };

        match expiration_time {
            Some(expiration_time) if expiration_time > self.inner.clock.now() => {
                // Fired on the delay cap, not the expiration
                self.schedule_logout(expiration_time);
            }
            _ => {
                info!("Session expired");
                self.logout();
            }
        }
    }

    fn notify(&self) {
        let session = self.session();
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .entries
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in listeners {
            listener(&session);
        }
    }
}

impl PartialEq for SessionStore {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("SessionStore")
            .field("is_logged_in", &state.session.is_logged_in())
            .field("expiration_time", &state.session.expiration_time)
            .field("pending_logout", &state.timer.is_some())
            .finish()
    }
}

/// Keeps a session listener registered while alive
#[must_use = "dropping the subscription unregisters the listener"]
pub struct Subscription {
    id: u64,
    inner: Weak<Inner>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner
                .listeners
                .borrow_mut()
                .entries
                .retain(|(id, _)| *id != self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
