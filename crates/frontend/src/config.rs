//! Frontend configuration

use portal_core::SessionConfig;

/// Application configuration
pub struct AppConfig;

impl AppConfig {
    /// Id of the element the application mounts into
    pub const ROOT_ELEMENT_ID: &'static str = "app";

    /// Default log filter for the browser console
    pub const LOG_LEVEL: &'static str = "info";

    /// Appended to every page title
    pub const TITLE_SUFFIX: &'static str = "Portal";

    /// Session settings used by the running application
    pub fn session() -> SessionConfig {
        SessionConfig::default()
    }

    pub fn page_title(title: &str) -> String {
        format!("{title} | {}", Self::TITLE_SUFFIX)
    }
}
