//! Application root

use crate::components::{ScrollToTop, Spinner};
use crate::router::{AppRoute, switch};
use crate::session::SessionProvider;
use portal_core::SessionStore;
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub store: SessionStore,
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let fallback = html! { <Spinner label="Ładowanie…" /> };

    html! {
        <SessionProvider store={props.store.clone()}>
            <BrowserRouter>
                <ScrollToTop />
                <main class="min-h-screen bg-gray-50 text-gray-900">
                    <Suspense {fallback}>
                        <Switch<AppRoute> render={switch} />
                    </Suspense>
                </main>
            </BrowserRouter>
        </SessionProvider>
    }
}
