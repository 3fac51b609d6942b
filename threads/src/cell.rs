//! Shared mutable state holder used by the stores.
//!
//! The browser implements this over a Leptos `RwSignal` so each `update`
//! is one reactive notification; native callers use `Rc<RefCell<T>>`.
//! Every store transition happens inside a single `update` call, which is
//! what keeps `sending` and the pending placeholder in lockstep for any
//! observer.

use std::cell::RefCell;
use std::rc::Rc;

pub trait StateCell<T> {
    /// Mutate the state. `None` when the backing cell no longer exists
    /// (for example a disposed signal after its view unmounted).
    fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R>;

    /// Read the state without subscribing to it.
    fn with<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R>;
}

impl<T> StateCell<T> for Rc<RefCell<T>> {
    fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        Some(f(&mut self.borrow_mut()))
    }

    fn with<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        Some(f(&self.borrow()))
    }
}
