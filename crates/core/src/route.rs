//! Route table and access gating

use serde::{Deserialize, Serialize};

/// A page of the application shell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Page {
    Home,
    Login,
    Register,
    ResetPassword,
    Panel,
    Admin,
}

impl Page {
    pub const ALL: [Page; 6] = [
        Page::Home,
        Page::Login,
        Page::Register,
        Page::ResetPassword,
        Page::Panel,
        Page::Admin,
    ];

    /// Canonical URL path
    pub fn path(self) -> &'static str {
        match self {
            Page::Home => "/",
            Page::Login => "/zaloguj-sie",
            Page::Register => "/zarejestruj-sie",
            Page::ResetPassword => "/przypomnij-haslo",
            Page::Panel => "/moje-konto",
            Page::Admin => "/admin",
        }
    }

    /// Name of the lazily loaded module backing the page
    pub fn module_name(self) -> &'static str {
        match self {
            Page::Home => "core/home",
            Page::Login => "accounts/login",
            Page::Register => "accounts/register",
            Page::ResetPassword => "accounts/reset-password",
            Page::Panel => "panel/home",
            Page::Admin => "admin/home",
        }
    }

    pub fn access(self) -> Access {
        match self {
            Page::Panel | Page::Admin => Access::SessionOnly,
            _ => Access::Public,
        }
    }
}

/// Who may reach a route
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Access {
    Public,
    /// Only part of the table while a session is active
    SessionOnly,
}

impl Access {
    pub fn allows(self, is_logged_in: bool) -> bool {
        match self {
            Access::Public => true,
            Access::SessionOnly => is_logged_in,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub page: Page,
    pub access: Access,
}

/// Outcome of looking up a path
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Render(Page),
    Redirect(Page),
}

/// Static path table with a wildcard redirect
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<Route>,
    fallback: Page,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            routes: Page::ALL
                .iter()
                .map(|&page| Route {
                    path: page.path(),
                    page,
                    access: page.access(),
                })
                .collect(),
            fallback: Page::Home,
        }
    }
}

impl RouteTable {
    pub fn fallback(&self) -> Page {
        self.fallback
    }

    /// Routes present in the table for the given session state
    pub fn active(&self, is_logged_in: bool) -> impl Iterator<Item = &Route> + '_ {
        self.routes
            .iter()
            .filter(move |route| route.access.allows(is_logged_in))
    }

    /// Resolve a location to a page, falling through to the wildcard
    /// redirect when nothing in the active table matches
    pub fn resolve(&self, location: &str, is_logged_in: bool) -> Resolution {
        let path = normalize_path(location);
        self.active(is_logged_in)
            .find(|route| route.path.eq_ignore_ascii_case(&path))
            .map_or(Resolution::Redirect(self.fallback), |route| {
                Resolution::Render(route.page)
            })
    }

    /// Apply the table's gating to an already matched page
    pub fn gate(&self, page: Page, is_logged_in: bool) -> Resolution {
        if self
            .active(is_logged_in)
            .any(|route| route.page == page)
        {
            Resolution::Render(page)
        } else {
            Resolution::Redirect(self.fallback)
        }
    }
}

/// Strip query and fragment, collapse trailing slashes and ensure a leading one
pub fn normalize_path(location: &str) -> String {
    let end = location.find(['?', '#']).unwrap_or(location.len());
    let trimmed = location[..end].trim().trim_end_matches('/');

    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_routes_always_render() {
        let table = RouteTable::default();
        for logged_in in [false, true] {
            assert_eq!(table.resolve("/", logged_in), Resolution::Render(Page::Home));
            assert_eq!(
                table.resolve("/zaloguj-sie", logged_in),
                Resolution::Render(Page::Login)
            );
            assert_eq!(
                table.resolve("/zarejestruj-sie", logged_in),
                Resolution::Render(Page::Register)
            );
            assert_eq!(
                table.resolve("/przypomnij-haslo", logged_in),
                Resolution::Render(Page::ResetPassword)
            );
        }
    }

    #[test]
    fn test_session_routes_are_gated() {
        let table = RouteTable::default();

        assert_eq!(table.resolve("/admin", false), Resolution::Redirect(Page::Home));
        assert_eq!(
            table.resolve("/moje-konto", false),
            Resolution::Redirect(Page::Home)
        );
        assert_eq!(table.resolve("/admin", true), Resolution::Render(Page::Admin));
        assert_eq!(
            table.resolve("/moje-konto", true),
            Resolution::Render(Page::Panel)
        );

        assert_eq!(table.gate(Page::Admin, false), Resolution::Redirect(Page::Home));
        assert_eq!(table.gate(Page::Admin, true), Resolution::Render(Page::Admin));
        assert_eq!(table.gate(Page::Login, false), Resolution::Render(Page::Login));
    }

    #[test]
    fn test_unknown_paths_redirect_home() {
        let table = RouteTable::default();
        for path in ["/nie-ma", "/admin/users", "/moje-konto/ustawienia", "/.."] {
            for logged_in in [false, true] {
                assert_eq!(
                    table.resolve(path, logged_in),
                    Resolution::Redirect(Page::Home),
                    "{path} logged_in={logged_in}"
                );
            }
        }
    }

    #[test]
    fn test_matching_is_lenient() {
        let table = RouteTable::default();

        assert_eq!(table.resolve("/Zaloguj-Sie", false), Resolution::Render(Page::Login));
        assert_eq!(table.resolve("/zaloguj-sie/", false), Resolution::Render(Page::Login));
        assert_eq!(
            table.resolve("/zaloguj-sie?next=/admin#form", false),
            Resolution::Render(Page::Login)
        );
        assert_eq!(table.resolve("", false), Resolution::Render(Page::Home));
        assert_eq!(table.resolve("?x=1", true), Resolution::Render(Page::Home));
    }

    #[test]
    fn test_active_table_size() {
        let table = RouteTable::default();
        assert_eq!(table.active(false).count(), 4);
        assert_eq!(table.active(true).count(), 6);
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("///"), "/");
        assert_eq!(normalize_path("admin"), "/admin");
        assert_eq!(normalize_path("/admin//"), "/admin");
        assert_eq!(normalize_path("/a#b?c"), "/a");
    }
}
