// SPDX-License-Identifier: MIT OR Apache-2.0

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::traits::{LocalStore, StorageError};

/// In-memory store.
///
/// Nothing outlives the process, use this in development or test contexts. An optional byte
/// capacity models the quota behavior of real browser storage.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    values: Rc<RefCell<HashMap<String, String>>>,
    capacity: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// In-memory store which refuses writes once the total size of all values exceeds the given
    /// number of bytes.
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            values: Rc::default(),
            capacity: Some(bytes),
        }
    }

    fn used_bytes_with(&self, key: &str, value: &str) -> usize {
        let values = self.values.borrow();
        values
            .iter()
            .filter(|(existing, _)| existing.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum::<usize>()
            + key.len()
            + value.len()
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(capacity) = self.capacity
            && self.used_bytes_with(key, value) > capacity
        {
            return Err(StorageError::QuotaExceeded(key.to_string()));
        }

        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}
