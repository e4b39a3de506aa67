//! Session module

pub mod context;

pub use context::{SessionContext, SessionProvider, use_is_logged_in, use_session};
