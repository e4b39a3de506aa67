//! URL routes and session gating

use crate::pages::LazyPage;
use crate::session::use_is_logged_in;
use portal_core::{Page, Resolution, RouteTable};
use yew::prelude::*;
use yew_router::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Routable)]
pub enum AppRoute {
    #[at("/")]
    Home,
    #[at("/zaloguj-sie")]
    Login,
    #[at("/zarejestruj-sie")]
    Register,
    #[at("/przypomnij-haslo")]
    ResetPassword,
    #[at("/moje-konto")]
    Panel,
    #[at("/admin")]
    Admin,
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl AppRoute {
    pub fn page(self) -> Option<Page> {
        match self {
            AppRoute::Home => Some(Page::Home),
            AppRoute::Login => Some(Page::Login),
            AppRoute::Register => Some(Page::Register),
            AppRoute::ResetPassword => Some(Page::ResetPassword),
            AppRoute::Panel => Some(Page::Panel),
            AppRoute::Admin => Some(Page::Admin),
            AppRoute::NotFound => None,
        }
    }
}

impl From<Page> for AppRoute {
    fn from(page: Page) -> Self {
        match page {
            Page::Home => AppRoute::Home,
            Page::Login => AppRoute::Login,
            Page::Register => AppRoute::Register,
            Page::ResetPassword => AppRoute::ResetPassword,
            Page::Panel => AppRoute::Panel,
            Page::Admin => AppRoute::Admin,
        }
    }
}

pub fn switch(route: AppRoute) -> Html {
    html! { <RouteView {route} /> }
}

#[derive(Properties, PartialEq)]
pub struct RouteViewProps {
    pub route: AppRoute,
}

/// Renders a matched route, or redirects when the route is not part of the
/// table for the current session. Consumes the session context, so a logout
/// while on a gated page redirects straight away.
#[function_component(RouteView)]
fn route_view(props: &RouteViewProps) -> Html {
    let is_logged_in = use_is_logged_in();
    let location = use_location();
    let table = RouteTable::default();

    let resolution = match props.route.page() {
        Some(page) => table.gate(page, is_logged_in),
        // The router's matching is exact; give the lenient table a chance
        None => {
            let path = location
                .as_ref()
                .map_or_else(|| "/".to_string(), |location| location.path().to_string());
            table.resolve(&path, is_logged_in)
        }
    };

    match resolution {
        Resolution::Render(page) => html! { <LazyPage {page} /> },
        Resolution::Redirect(page) => {
            tracing::debug!(route = ?props.route, to = page.path(), "Redirecting");
            html! { <Redirect<AppRoute> to={AppRoute::from(page)} /> }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths_match_table() {
        for page in Page::ALL {
            let route = AppRoute::from(page);
            assert_eq!(route.to_path(), page.path());
            assert_eq!(route.page(), Some(page));
        }
    }

    #[test]
    fn test_recognize_known_paths() {
        assert_eq!(AppRoute::recognize("/admin"), Some(AppRoute::Admin));
        assert_eq!(AppRoute::recognize("/zaloguj-sie"), Some(AppRoute::Login));
        assert_eq!(AppRoute::not_found_route(), Some(AppRoute::NotFound));
    }
}
