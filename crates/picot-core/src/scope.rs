use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::Dispose;

thread_local! {
    static CURRENT: RefCell<Option<Weak<ScopeInner>>> = const { RefCell::new(None) };
}

/// Owner of a tree of disposers.
///
/// Anything created while a scope is installed (via [`Scope::run`]) can
/// attach cleanup to it with [`scoped_effect`] or [`Scope::add_disposer`];
/// `dispose` runs children first, then the scope's own disposers. Dropping
/// the last handle to a never-disposed scope also runs them.
pub struct Scope {
    inner: Rc<ScopeInner>,
}

#[derive(Default)]
struct ScopeInner {
    disposers: RefCell<Vec<Dispose>>,
    children: RefCell<Vec<Scope>>,
}

impl Scope {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(ScopeInner::default()),
        }
    }

    /// Installs this scope as the thread-current one for the duration of `f`.
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> R {
        CURRENT.with(|current| {
            let prev = current.borrow().clone();
            *current.borrow_mut() = Some(Rc::downgrade(&self.inner));
            let result = f();
            *current.borrow_mut() = prev;
            result
        })
    }

    pub fn add_disposer(&self, d: Dispose) {
        self.inner.disposers.borrow_mut().push(d);
    }

    pub fn child(&self) -> Scope {
        let child = Scope::new();
        self.inner.children.borrow_mut().push(child.clone());
        child
    }

    pub fn dispose(self) {
        self.inner.dispose_all();
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Scope {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl ScopeInner {
    fn dispose_all(&self) {
        let children = std::mem::take(&mut *self.children.borrow_mut());
        for child in children {
            child.dispose();
        }
        let disposers = std::mem::take(&mut *self.disposers.borrow_mut());
        for d in disposers {
            d.run();
        }
    }
}

impl Drop for ScopeInner {
    fn drop(&mut self) {
        self.dispose_all();
    }
}

pub fn current_scope() -> Option<Scope> {
    CURRENT.with(|current| {
        current
            .borrow()
            .as_ref()
            .and_then(|weak| weak.upgrade().map(|inner| Scope { inner }))
    })
}

/// Runs `f` now and attaches its cleanup to the current scope.
///
/// Without an installed scope the cleanup is orphaned; the returned
/// `Dispose` is the caller's last chance to run it manually.
pub fn scoped_effect(f: impl FnOnce() -> Dispose) -> Dispose {
    let d = f();
    if let Some(scope) = current_scope() {
        scope.add_disposer(d.clone());
    } else {
        log::debug!("scoped_effect: no scope installed; cleanup is manual");
    }
    d
}
