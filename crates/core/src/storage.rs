//! Durable key-value storage backing the session

use crate::error::CoreResult;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// String key-value store with browser `localStorage` semantics
#[cfg_attr(test, mockall::automock)]
pub trait SessionStorage {
    fn get_item(&self, key: &str) -> CoreResult<Option<String>>;

    fn set_item(&self, key: &str, value: &str) -> CoreResult<()>;

    /// Removing a missing key is not an error
    fn remove_item(&self, key: &str) -> CoreResult<()>;

    /// Read a boolean flag stored as the literal string `"true"`.
    ///
    /// Anything else, including a missing key or a failed read, is `false`.
    fn get_flag(&self, key: &str) -> bool {
        matches!(self.get_item(key), Ok(Some(value)) if value == "true")
    }
}

/// In-memory storage, cheap to clone; clones share the same map
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items<I, K, V>(items: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let storage = Self::new();
        storage.items.borrow_mut().extend(
            items
                .into_iter()
                .map(|(key, value)| (key.into(), value.into())),
        );
        storage
    }

    pub fn contains(&self, key: &str) -> bool {
        self.items.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl SessionStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> CoreResult<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> CoreResult<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}
