//! Browser implementations of the session store's storage and timer seams

use gloo_timers::callback::Timeout;
use portal_core::{
    CoreError, CoreResult, MemoryStorage, SessionStorage, TimerCallback, TimerHandle,
    TimerScheduler,
};
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen::JsValue;
use web_sys::Storage;

/// `window.localStorage`, storing raw string values
pub struct BrowserStorage {
    storage: Storage,
}

impl BrowserStorage {
    pub fn local() -> CoreResult<Self> {
        let window = web_sys::window().ok_or_else(|| CoreError::storage("no window"))?;
        let storage = window
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| CoreError::storage("localStorage is unavailable"))?;
        Ok(Self { storage })
    }
}

impl SessionStorage for BrowserStorage {
    fn get_item(&self, key: &str) -> CoreResult<Option<String>> {
        self.storage.get_item(key).map_err(js_error)
    }

    fn set_item(&self, key: &str, value: &str) -> CoreResult<()> {
        self.storage.set_item(key, value).map_err(js_error)
    }

    fn remove_item(&self, key: &str) -> CoreResult<()> {
        self.storage.remove_item(key).map_err(js_error)
    }
}

/// Local storage when the browser allows it, otherwise a per-page-load map
pub fn session_storage() -> Rc<dyn SessionStorage> {
    match BrowserStorage::local() {
        Ok(storage) => Rc::new(storage),
        Err(err) => {
            tracing::warn!(error = %err, "Sessions will not persist across reloads");
            Rc::new(MemoryStorage::new())
        }
    }
}

fn js_error(err: JsValue) -> CoreError {
    CoreError::storage(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

/// Longest delay `setTimeout` honours
const MAX_TIMEOUT_MS: u128 = i32::MAX as u128;

/// Schedules timers with `setTimeout`
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooScheduler;

impl TimerScheduler for GlooScheduler {
    fn schedule(&self, delay: Duration, callback: TimerCallback) -> Box<dyn TimerHandle> {
        let millis = delay.as_millis().min(MAX_TIMEOUT_MS) as u32;
        Box::new(GlooTimer(Timeout::new(millis, callback)))
    }
}

struct GlooTimer(Timeout);

impl TimerHandle for GlooTimer {
    fn cancel(self: Box<Self>) {
        let _ = self.0.cancel();
    }
}
