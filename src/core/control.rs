//! Controlled-or-uncontrolled state.
//!
//! A component that may be driven by its parent (the layout owns the value and
//! hands down a [`StateCell`]) or may own the value itself takes a
//! [`Controllable`]. Both sides read and write through the same `{get, set}`
//! capability, so the parent never threads individual flags through.

use std::fmt;
use std::sync::{Arc, RwLock};

/// Read/write capability over a shared value.
pub trait StateCell<T>: Send + Sync {
    fn get(&self) -> T;
    fn set(&self, value: T);
}

/// A [`StateCell`] backed by an `Arc<RwLock<T>>`. Clones share the value.
#[derive(Default)]
pub struct SharedState<T> {
    inner: Arc<RwLock<T>>,
}

impl<T> SharedState<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(RwLock::new(value)),
        }
    }
}

impl<T> Clone for SharedState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Send + Sync> StateCell<T> for SharedState<T> {
    fn get(&self) -> T {
        // A poisoned lock still holds the last written value
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set(&self, value: T) {
        match self.inner.write() {
            Ok(mut guard) => *guard = value,
            Err(poisoned) => *poisoned.into_inner() = value,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedState").field("inner", &self.inner).finish()
    }
}

/// State that is either injected by a parent or owned locally.
pub enum Controllable<T> {
    Controlled(Arc<dyn StateCell<T>>),
    Uncontrolled(T),
}

impl<T: Clone> Controllable<T> {
    /// Use the parent's cell when given, otherwise own `fallback`.
    pub fn new(external: Option<Arc<dyn StateCell<T>>>, fallback: T) -> Self {
        match external {
            Some(cell) => Controllable::Controlled(cell),
            None => Controllable::Uncontrolled(fallback),
        }
    }

    pub fn get(&self) -> T {
        match self {
            Controllable::Controlled(cell) => cell.get(),
            Controllable::Uncontrolled(value) => value.clone(),
        }
    }

    pub fn set(&mut self, value: T) {
        match self {
            Controllable::Controlled(cell) => cell.set(value),
            Controllable::Uncontrolled(own) => *own = value,
        }
    }

    pub fn is_controlled(&self) -> bool {
        matches!(self, Controllable::Controlled(_))
    }
}

impl<T: fmt::Debug> fmt::Debug for Controllable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Controllable::Controlled(_) => f.write_str("Controlled(..)"),
            Controllable::Uncontrolled(value) => f.debug_tuple("Uncontrolled").field(value).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uncontrolled_owns_value() {
        let mut open = Controllable::new(None, false);
        assert!(!open.is_controlled());
        open.set(true);
        assert!(open.get());
    }

    #[test]
    fn test_controlled_writes_through_to_parent() {
        let parent = SharedState::new(true);
        let mut open = Controllable::new(Some(Arc::new(parent.clone()) as Arc<dyn StateCell<bool>>), false);

        assert!(open.is_controlled());
        // Fallback ignored when a cell is injected
        assert!(open.get());

        open.set(false);
        assert!(!parent.get());

        parent.set(true);
        assert!(open.get());
    }
}
