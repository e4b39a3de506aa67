//! Lazily loaded modules with a single in-flight load and a cached result

use crate::error::{CoreError, CoreResult};
use futures::future::{self, FutureExt, LocalBoxFuture, Shared};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;
use std::rc::{Rc, Weak};
use tracing::{debug, warn};

/// Future resolving to a loaded module; clones share one load
pub type ModuleFuture<T> = Shared<LocalBoxFuture<'static, CoreResult<Rc<T>>>>;

type Loader<T> = Box<dyn Fn() -> LocalBoxFuture<'static, CoreResult<T>>>;

enum State<T> {
    Idle,
    Loading(ModuleFuture<T>),
    Ready(Rc<T>),
    Failed(CoreError),
}

/// Observable load status
pub enum LoadStatus<T> {
    Idle,
    Loading,
    Ready(Rc<T>),
    Failed(CoreError),
}

impl<T> Clone for LoadStatus<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Idle => Self::Idle,
            Self::Loading => Self::Loading,
            Self::Ready(module) => Self::Ready(Rc::clone(module)),
            Self::Failed(err) => Self::Failed(err.clone()),
        }
    }
}

impl<T> fmt::Debug for LoadStatus<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("Idle"),
            Self::Loading => f.write_str("Loading"),
            Self::Ready(_) => f.write_str("Ready"),
            Self::Failed(err) => f.debug_tuple("Failed").field(err).finish(),
        }
    }
}

/// A module produced on first use.
///
/// Concurrent `load` calls share the same in-flight load. A successful
/// result is cached for the life of the value; a failure is recorded and the
/// next `load` starts over.
pub struct LazyModule<T> {
    name: &'static str,
    loader: Loader<T>,
    state: Rc<RefCell<State<T>>>,
    attempts: Cell<u32>,
}

impl<T: 'static> LazyModule<T> {
    pub fn new<F, Fut>(name: &'static str, loader: F) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = CoreResult<T>> + 'static,
    {
        Self {
            name,
            loader: Box::new(move || loader().boxed_local()),
            state: Rc::new(RefCell::new(State::Idle)),
            attempts: Cell::new(0),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of times the loader has been started
    pub fn attempts(&self) -> u32 {
        self.attempts.get()
    }

    /// The module, if it has finished loading
    pub fn get(&self) -> Option<Rc<T>> {
        match &*self.state.borrow() {
            State::Ready(module) => Some(Rc::clone(module)),
            _ => None,
        }
    }

    pub fn status(&self) -> LoadStatus<T> {
        match &*self.state.borrow() {
            State::Idle => LoadStatus::Idle,
            State::Loading(_) => LoadStatus::Loading,
            State::Ready(module) => LoadStatus::Ready(Rc::clone(module)),
            State::Failed(err) => LoadStatus::Failed(err.clone()),
        }
    }

    /// Start loading, or join the load already in flight
    pub fn load(&self) -> ModuleFuture<T> {
        let mut state = self.state.borrow_mut();
        match &*state {
            State::Ready(module) => {
                return future::ready(Ok(Rc::clone(module)))
                    .boxed_local()
                    .shared();
            }
            State::Loading(pending) => return pending.clone(),
            State::Idle | State::Failed(_) => {}
        }

        self.attempts.set(self.attempts.get() + 1);
        debug!(module = self.name, attempt = self.attempts.get(), "Loading module");

        let name = self.name;
        let loading = (self.loader)();
        let slot = Rc::downgrade(&self.state);
        let pending = async move {
            let result = loading.await.map(Rc::new);
            settle(&slot, name, &result);
            result
        }
        .boxed_local()
        .shared();

        *state = State::Loading(pending.clone());
        pending
    }
}

fn settle<T>(slot: &Weak<RefCell<State<T>>>, name: &'static str, result: &CoreResult<Rc<T>>) {
    let Some(slot) = slot.upgrade() else {
        return;
    };
    *slot.borrow_mut() = match result {
        Ok(module) => {
            debug!(module = name, "Module ready");
            State::Ready(Rc::clone(module))
        }
        Err(err) => {
            warn!(module = name, error = %err, "Module failed to load");
            State::Failed(err.clone())
        }
    };
}

impl<T> fmt::Debug for LazyModule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match &*self.state.borrow() {
            State::Idle => "idle",
            State::Loading(_) => "loading",
            State::Ready(_) => "ready",
            State::Failed(_) => "failed",
        };
        f.debug_struct("LazyModule")
            .field("name", &self.name)
            .field("status", &status)
            .field("attempts", &self.attempts.get())
            .finish()
    }
}
