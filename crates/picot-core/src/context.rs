//! Explicitly injected shared state.
//!
//! A single root owns a [`Provider<T>`]; every dependent receives a
//! [`ContextHandle<T>`] by parameter. Handles are weak: they never keep the
//! state alive, and using one after the provider is gone (or using
//! [`ContextHandle::detached`]) fails loudly with a [`ContextError`]
//! instead of silently reading stale state.

use std::any::type_name;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::error::ContextError;

/// Root owner of a piece of shared state.
pub struct Provider<T> {
    value: Rc<RefCell<T>>,
}

impl<T> Provider<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Rc::new(RefCell::new(value)),
        }
    }

    /// Hands out a weak handle for a dependent.
    pub fn handle(&self) -> ContextHandle<T> {
        ContextHandle {
            binding: Binding::Bound(Rc::downgrade(&self.value)),
        }
    }

    /// Direct access for the owner itself.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.borrow())
    }

    pub fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.value.borrow_mut())
    }
}

/// Weak, cloneable handle to state owned by a [`Provider`].
pub struct ContextHandle<T> {
    binding: Binding<T>,
}

enum Binding<T> {
    /// Never attached to any provider.
    Detached,
    Bound(Weak<RefCell<T>>),
}

impl<T> ContextHandle<T> {
    /// A handle bound to nothing. Every access fails with
    /// [`ContextError::Unprovided`]; useful as a default for optional
    /// dependencies that must not be silently absent.
    pub fn detached() -> Self {
        Self {
            binding: Binding::Detached,
        }
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> Result<R, ContextError> {
        let cell = self.upgrade()?;
        let guard = cell.try_borrow().map_err(|_| ContextError::Reentrant {
            context: type_name::<T>(),
        })?;
        Ok(f(&guard))
    }

    pub fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R, ContextError> {
        let cell = self.upgrade()?;
        let mut guard = cell.try_borrow_mut().map_err(|_| ContextError::Reentrant {
            context: type_name::<T>(),
        })?;
        Ok(f(&mut guard))
    }

    pub fn is_live(&self) -> bool {
        matches!(&self.binding, Binding::Bound(w) if w.strong_count() > 0)
    }

    fn upgrade(&self) -> Result<Rc<RefCell<T>>, ContextError> {
        match &self.binding {
            Binding::Detached => Err(ContextError::Unprovided {
                context: type_name::<T>(),
            }),
            Binding::Bound(weak) => weak.upgrade().ok_or(ContextError::Dropped {
                context: type_name::<T>(),
            }),
        }
    }
}

impl<T> Clone for ContextHandle<T> {
    fn clone(&self) -> Self {
        Self {
            binding: match &self.binding {
                Binding::Detached => Binding::Detached,
                Binding::Bound(w) => Binding::Bound(w.clone()),
            },
        }
    }
}
