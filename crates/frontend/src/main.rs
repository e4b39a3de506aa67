use portal_core::{SessionStore, SystemClock};
use portal_frontend::{App, AppConfig, AppProps, GlooScheduler, browser, logging};
use std::rc::Rc;

fn main() {
    logging::init_tracing();

    let store = SessionStore::restore(
        AppConfig::session(),
        browser::session_storage(),
        Rc::new(SystemClock),
        Rc::new(GlooScheduler),
    );
    tracing::info!(logged_in = store.is_logged_in(), "Session restored");

    let props = AppProps { store };
    match gloo::utils::document().get_element_by_id(AppConfig::ROOT_ELEMENT_ID) {
        Some(root) => yew::Renderer::<App>::with_root_and_props(root, props).render(),
        None => {
            tracing::warn!(id = AppConfig::ROOT_ELEMENT_ID, "Root element missing, mounting on body");
            yew::Renderer::<App>::with_props(props).render()
        }
    };
}
