//! Type-erased key-value state
//!
//! [`State`] is the storage behind an [`EventProcessor`](crate::EventProcessor).
//! It has no schema: every value is stored as a `Box<dyn Any>` under a string
//! key, and readers name the type they expect. Reading a key with the wrong
//! type behaves exactly like reading a missing key.
//!
//! The conventional keys used by the pointer and gesture middleware live in
//! [`keys`].
//!
//! # Example
//!
//! ```rust
//! use tactile_core::State;
//!
//! let mut state = State::new().with("count", 1i32);
//! assert_eq!(state.get::<i32>("count"), Some(1));
//! assert_eq!(state.get::<String>("count"), None);
//!
//! state.insert("count", 2i32);
//! assert_eq!(state.get::<i32>("count"), Some(2));
//! ```

use rustc_hash::FxHashMap;
use std::any::Any;
use std::fmt;

/// Well-known state keys shared by convention between middleware
pub mod keys {
    /// Active pointers, keyed by pointer key
    pub const POINTERS: &str = "pointers";
    /// Active gestures, keyed by entity id
    pub const GESTURES: &str = "gestures";
    /// Last recorded mouse position
    pub const MOUSE_POSITION: &str = "mouse_position";
    /// Currently pressed keys
    pub const KEYS: &str = "keys";
}

/// A key-value map holding values of any type
#[derive(Default)]
pub struct State {
    values: FxHashMap<String, Box<dyn Any>>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, used to seed initial state
    pub fn with<T: 'static>(mut self, key: impl Into<String>, value: T) -> Self {
        self.insert(key, value);
        self
    }

    /// Get a clone of the value at `key`
    pub fn get<T: Clone + 'static>(&self, key: &str) -> Option<T> {
        self.get_ref::<T>(key).cloned()
    }

    /// Borrow the value at `key`
    pub fn get_ref<T: 'static>(&self, key: &str) -> Option<&T> {
        self.values.get(key).and_then(|v| v.downcast_ref::<T>())
    }

    /// Mutably borrow the value at `key`
    pub fn get_mut<T: 'static>(&mut self, key: &str) -> Option<&mut T> {
        self.values.get_mut(key).and_then(|v| v.downcast_mut::<T>())
    }

    /// Run `f` on the value at `key`, inserting `T::default()` first if the
    /// key is missing or holds a different type
    pub fn with_default<T: Default + 'static, R>(&mut self, key: &str, f: impl FnOnce(&mut T) -> R) -> R {
        let slot = self
            .values
            .entry(key.to_owned())
            .or_insert_with(|| Box::new(T::default()) as Box<dyn Any>);
        if !slot.is::<T>() {
            tracing::trace!(key, "replacing state value of a different type");
            *slot = Box::new(T::default());
        }
        match slot.downcast_mut::<T>() {
            Some(value) => f(value),
            None => {
                let mut value = T::default();
                let result = f(&mut value);
                *slot = Box::new(value);
                result
            }
        }
    }

    /// Replace the value at `key`
    pub fn insert<T: 'static>(&mut self, key: impl Into<String>, value: T) {
        self.values.insert(key.into(), Box::new(value));
    }

    /// Remove the value at `key`, returning whether it was present
    pub fn remove(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Get all keys currently set
    pub fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.values.keys().collect();
        keys.sort();
        f.debug_struct("State").field("keys", &keys).finish()
    }
}
