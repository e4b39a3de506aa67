pub mod app;
pub mod browser;
pub mod components;
pub mod config;
pub mod logging;
pub mod pages;
pub mod router;
pub mod session;

pub use app::{App, AppProps};
pub use browser::{BrowserStorage, GlooScheduler};
pub use config::AppConfig;
pub use router::AppRoute;
pub use session::{SessionContext, SessionProvider, use_is_logged_in, use_session};
