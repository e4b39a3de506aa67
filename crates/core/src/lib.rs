//! Portal core: session lifecycle, route table and lazy module loading

pub mod clock;
pub mod config;
pub mod error;
pub mod lazy;
pub mod route;
pub mod session;
pub mod storage;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod timer;

pub use clock::{Clock, SystemClock};
pub use config::SessionConfig;
pub use error::{CoreError, CoreResult, ErrorContext};
pub use lazy::{LazyModule, LoadStatus, ModuleFuture};
pub use route::{Access, Page, Resolution, Route, RouteTable};
pub use session::{Session, SessionStore, Subscription};
pub use storage::{MemoryStorage, SessionStorage};
pub use timer::{TimerCallback, TimerHandle, TimerScheduler};
