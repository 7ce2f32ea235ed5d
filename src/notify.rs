use indexmap::IndexMap;
use std::cell::{Cell, RefCell};
use std::fmt::{self, Debug};
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObserveError {
    #[error("observer not found")]
    ObserverNotFound,
}

/// An observer callback, invoked without arguments on every change.
pub type ChangeObserver = Rc<dyn Fn()>;

/// A per-pointer observable. Subscribers are invoked synchronously and in
/// subscription order by [`ChangeNotifier::emit`].
#[derive(Default)]
pub struct ChangeNotifier {
    observers: RefCell<IndexMap<u32, ChangeObserver>>,
    next_id: Cell<u32>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer and returns its subscription id.
    pub fn subscribe<F: Fn() + 'static>(&self, observer: F) -> u32 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.observers.borrow_mut().insert(id, Rc::new(observer));
        id
    }

    /// Removes an observer by its subscription id.
    pub fn unsubscribe(&self, id: u32) -> Result<(), ObserveError> {
        self.observers
            .borrow_mut()
            .shift_remove(&id)
            .map(|_| ())
            .ok_or(ObserveError::ObserverNotFound)
    }

    /// Synchronously invokes every observer registered at the time of the
    /// call, in subscription order. The observer list is snapshotted first,
    /// so an observer may subscribe or unsubscribe while the emission runs.
    pub fn emit(&self) {
        let observers: Vec<ChangeObserver> =
            self.observers.borrow().values().cloned().collect();
        for observer in observers {
            observer();
        }
    }

    pub fn len(&self) -> usize {
        self.observers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.borrow().is_empty()
    }
}

impl Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("observers", &self.len())
            .finish()
    }
}
