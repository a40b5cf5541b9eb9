//! In-memory state store for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::traits::{StateStore, StoreError};

/// In-memory [`StateStore`] with switchable failures.
///
/// # Example
///
/// ```ignore
/// use chatline::adapters::mock::InMemoryStateStore;
/// use chatline::traits::{StateStore, CONVERSATION_ID_KEY};
///
/// let store = InMemoryStateStore::with_value(CONVERSATION_ID_KEY, "conv-1");
/// assert_eq!(store.get(CONVERSATION_ID_KEY).await?, Some("conv-1".to_string()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStateStore {
    values: Arc<Mutex<HashMap<String, String>>>,
    get_should_fail: Arc<Mutex<bool>>,
    set_should_fail: Arc<Mutex<bool>>,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding one initial value.
    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        locked(&store.values).insert(key.to_string(), value.to_string());
        store
    }

    /// Configure whether get should fail.
    pub fn set_get_should_fail(&self, should_fail: bool) {
        *locked(&self.get_should_fail) = should_fail;
    }

    /// Configure whether set should fail.
    pub fn set_set_should_fail(&self, should_fail: bool) {
        *locked(&self.set_should_fail) = should_fail;
    }

    /// Read a value synchronously (for assertions).
    pub fn value(&self, key: &str) -> Option<String> {
        locked(&self.values).get(key).cloned()
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if *locked(&self.get_should_fail) {
            return Err(StoreError::Io("simulated read failure".to_string()));
        }
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if *locked(&self.set_should_fail) {
            return Err(StoreError::Io("simulated write failure".to_string()));
        }
        locked(&self.values).insert(key.to_string(), value.to_string());
        Ok(())
    }
}
