//! End-to-end session lifecycle against in-memory storage and virtual time

use chrono::Duration;
use portal_core::session::format_expiration;
use portal_core::testing::{ManualClock, ManualScheduler};
use portal_core::{
    Clock, MemoryStorage, Page, Resolution, RouteTable, Session, SessionConfig, SessionStorage,
    SessionStore,
};
use std::cell::RefCell;
use std::rc::Rc;

struct Browser {
    storage: MemoryStorage,
    clock: ManualClock,
    scheduler: ManualScheduler,
}

impl Browser {
    fn new() -> Self {
        let clock = ManualClock::default();
        Self {
            storage: MemoryStorage::new(),
            scheduler: ManualScheduler::new(clock.clone()),
            clock,
        }
    }

    /// Simulate a page load
    fn start(&self) -> SessionStore {
        SessionStore::restore(
            SessionConfig::default(),
            Rc::new(self.storage.clone()),
            Rc::new(self.clock.clone()),
            Rc::new(self.scheduler.clone()),
        )
    }

    fn persist(&self, token: &str, expires_in: Duration) {
        let expiration = self.clock.now() + expires_in;
        self.storage.set_item("Token", token).unwrap();
        self.storage
            .set_item("ExpirationTime", &format_expiration(expiration))
            .unwrap();
    }
}

#[test]
fn login_persists_both_fields() {
    let browser = Browser::new();
    let store = browser.start();

    store.login("abc", browser.clock.now() + Duration::days(1));

    assert!(store.is_logged_in());
    assert!(browser.storage.contains("Token"));
    assert!(browser.storage.contains("ExpirationTime"));
    assert_eq!(browser.storage.len(), 2);
}

#[test]
fn logout_clears_storage_and_timer() {
    let browser = Browser::new();
    let store = browser.start();
    store.login("abc", browser.clock.now() + Duration::minutes(10));

    store.logout();

    assert!(!store.is_logged_in());
    assert!(store.token().is_none());
    assert!(browser.storage.is_empty());
    assert_eq!(browser.scheduler.pending_count(), 0);

    browser.scheduler.advance(Duration::hours(1));
    assert_eq!(browser.scheduler.fired_count(), 0);
}

#[test]
fn startup_discards_session_near_expiry() {
    let browser = Browser::new();
    browser.persist("abc", Duration::milliseconds(3600));

    let store = browser.start();

    assert!(!store.is_logged_in());
    assert!(browser.storage.is_empty());
    assert_eq!(browser.scheduler.pending_count(), 0);
}

#[test]
fn startup_discards_session_already_expired() {
    let browser = Browser::new();
    browser.persist("abc", Duration::minutes(-5));

    let store = browser.start();

    assert!(!store.is_logged_in());
    assert!(browser.storage.is_empty());
}

#[test]
fn startup_restores_valid_session_with_exact_timer() {
    let browser = Browser::new();
    browser.persist("abc", Duration::minutes(20));

    let store = browser.start();

    assert!(store.is_logged_in());
    assert_eq!(store.token().as_deref(), Some("abc"));
    assert_eq!(
        browser.scheduler.scheduled_delays(),
        vec![std::time::Duration::from_secs(20 * 60)]
    );

    browser.scheduler.advance(Duration::minutes(20) - Duration::milliseconds(1));
    assert!(store.is_logged_in());

    browser.scheduler.advance(Duration::milliseconds(1));
    assert!(!store.is_logged_in());
    assert!(browser.storage.is_empty());
}

#[test]
fn second_login_replaces_first_timer() {
    let browser = Browser::new();
    let store = browser.start();

    store.login("first", browser.clock.now() + Duration::minutes(30));
    store.login("second", browser.clock.now() + Duration::minutes(60));

    assert_eq!(browser.scheduler.pending_count(), 1);
    assert_eq!(browser.scheduler.cancelled_count(), 1);
    assert_eq!(
        browser.scheduler.pending_delays(),
        vec![std::time::Duration::from_secs(60 * 60)]
    );

    // The first timer would have fired here
    browser.scheduler.advance(Duration::minutes(45));
    assert!(store.is_logged_in());
    assert_eq!(store.token().as_deref(), Some("second"));

    browser.scheduler.advance(Duration::minutes(15));
    assert!(!store.is_logged_in());
    assert_eq!(browser.scheduler.fired_count(), 1);
}

#[test]
fn shorter_second_login_fires_at_its_own_time() {
    let browser = Browser::new();
    let store = browser.start();

    store.login("first", browser.clock.now() + Duration::minutes(60));
    store.login("second", browser.clock.now() + Duration::minutes(5));

    browser.scheduler.advance(Duration::minutes(5));
    assert!(!store.is_logged_in());

    // A fresh login must not be cut short by the replaced 60 minute timer
    store.login("third", browser.clock.now() + Duration::hours(2));
    browser.scheduler.advance(Duration::minutes(90));
    assert!(store.is_logged_in());
}

#[test]
fn admin_route_follows_session() {
    let browser = Browser::new();
    let store = browser.start();
    let table = RouteTable::default();

    assert_eq!(
        table.resolve("/admin", store.is_logged_in()),
        Resolution::Redirect(Page::Home)
    );

    store.login("abc", browser.clock.now() + Duration::hours(1));
    assert_eq!(
        table.resolve("/admin", store.is_logged_in()),
        Resolution::Render(Page::Admin)
    );

    // Expiry takes the route away again
    browser.scheduler.advance(Duration::hours(1));
    assert_eq!(
        table.resolve("/admin", store.is_logged_in()),
        Resolution::Redirect(Page::Home)
    );
}

#[test]
fn unknown_path_redirects_in_every_state() {
    let browser = Browser::new();
    let store = browser.start();
    let table = RouteTable::default();

    assert_eq!(
        table.resolve("/o-nas", store.is_logged_in()),
        Resolution::Redirect(Page::Home)
    );
    store.login("abc", browser.clock.now() + Duration::hours(1));
    assert_eq!(
        table.resolve("/o-nas", store.is_logged_in()),
        Resolution::Redirect(Page::Home)
    );
}

#[test]
fn subscribers_see_expiry_until_unsubscribed() {
    let browser = Browser::new();
    let store = browser.start();
    let seen: Rc<RefCell<Vec<Session>>> = Rc::default();

    let subscription = {
        let seen = seen.clone();
        store.subscribe(move |session| seen.borrow_mut().push(session.clone()))
    };

    store.login("abc", browser.clock.now() + Duration::minutes(1));
    browser.scheduler.advance(Duration::minutes(1));

    {
        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].is_logged_in());
        assert_eq!(seen[1], Session::default());
    }

    drop(subscription);
    store.login("abc", browser.clock.now() + Duration::minutes(1));
    assert_eq!(seen.borrow().len(), 2);
}

#[test]
fn session_survives_reload() {
    let browser = Browser::new();
    let first = browser.start();
    first.login("abc", browser.clock.now() + Duration::hours(3));
    drop(first);

    browser.clock.advance(Duration::hours(1));
    let second = browser.start();

    assert!(second.is_logged_in());
    assert_eq!(second.remaining(), Some(Duration::hours(2)));
}
