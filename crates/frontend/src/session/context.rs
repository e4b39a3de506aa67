//! Session context and provider

use chrono::{DateTime, Duration, Utc};
use portal_core::{Session, SessionStore};
use yew::prelude::*;

/// Session context data handed to the view tree
#[derive(Clone, Debug, PartialEq)]
pub struct SessionContext {
    store: SessionStore,
    session: Session,
}

impl SessionContext {
    pub fn token(&self) -> Option<&str> {
        self.session.token.as_deref()
    }

    pub fn expiration_time(&self) -> Option<DateTime<Utc>> {
        self.session.expiration_time
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_logged_in()
    }

    pub fn login(&self, token: impl Into<String>, expiration_time: DateTime<Utc>) {
        self.store.login(token, expiration_time);
    }

    /// Log in with the configured default token lifetime
    pub fn login_with_default_lifetime(&self, token: impl Into<String>) {
        let lifetime = self.store.config().default_token_lifetime();
        self.store.login_for(token, lifetime);
    }

    pub fn logout(&self) {
        self.store.logout();
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.store.remaining()
    }
}

/// Session provider props
#[derive(Properties, PartialEq)]
pub struct SessionProviderProps {
    pub store: SessionStore,
    pub children: Children,
}

/// Publishes the store's session to the view tree and re-renders consumers
/// on every change, including timer-driven logouts
#[function_component(SessionProvider)]
pub fn session_provider(props: &SessionProviderProps) -> Html {
    let session = use_state(|| props.store.session());

    {
        let session = session.clone();
        use_effect_with(props.store.clone(), move |store| {
            // Catch up on anything that changed before the first render committed
            session.set(store.session());
            let subscription = store.subscribe(move |current| session.set(current.clone()));

            move || drop(subscription)
        });
    }

    let context = SessionContext {
        store: props.store.clone(),
        session: (*session).clone(),
    };

    html! {
        <ContextProvider<SessionContext> {context}>
            {props.children.clone()}
        </ContextProvider<SessionContext>>
    }
}

/// Hook to use the session context
#[hook]
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>()
        .expect("SessionContext not found. Make sure to wrap your component with SessionProvider")
}

/// Hook to check if a session is active
#[hook]
pub fn use_is_logged_in() -> bool {
    let session = use_session();
    session.is_logged_in()
}
