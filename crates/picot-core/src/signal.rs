use std::cell::RefCell;
use std::rc::Rc;

pub type SubId = usize;

/// Cloneable handle to an observable value.
///
/// All clones share the same storage; writes through any clone notify every
/// live subscriber synchronously, in subscription order.
#[derive(Clone)]
pub struct Signal<T: 'static>(Rc<RefCell<Slot<T>>>);

struct Slot<T> {
    value: T,
    // set while subscribers are being notified
    notifying: bool,
    // Subscriber slots; unsubscribed entries become None so SubIds stay stable.
    subs: Vec<Option<Rc<dyn Fn(&T)>>>,
}

impl<T> Signal<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(Slot {
            value,
            notifying: false,
            subs: Vec::new(),
        })))
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.0.borrow().value.clone()
    }

    /// Reads the value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.borrow().value)
    }

    pub fn set(&self, value: T)
    where
        T: Clone,
    {
        {
            self.0.borrow_mut().value = value;
        }
        self.notify();
    }

    pub fn update<F: FnOnce(&mut T)>(&self, f: F)
    where
        T: Clone,
    {
        {
            f(&mut self.0.borrow_mut().value);
        }
        self.notify();
    }

    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> SubId {
        let mut slot = self.0.borrow_mut();
        slot.subs.push(Some(Rc::new(f)));
        slot.subs.len() - 1
    }

    /// Detaches a subscriber. Unknown or already-removed ids are ignored.
    pub fn unsubscribe(&self, id: SubId) {
        if let Some(entry) = self.0.borrow_mut().subs.get_mut(id) {
            *entry = None;
        }
    }

    // Callbacks run against a snapshot with no borrow held, so a subscriber
    // may read or even write the signal it observes. A write made during
    // notification lands in the slot but is not re-delivered.
    fn notify(&self)
    where
        T: Clone,
    {
        let (value, subs) = {
            let mut slot = self.0.borrow_mut();
            if slot.notifying {
                return;
            }
            slot.notifying = true;
            let subs: Vec<Rc<dyn Fn(&T)>> = slot.subs.iter().filter_map(|s| s.clone()).collect();
            (slot.value.clone(), subs)
        };
        for sub in subs {
            sub(&value);
        }
        self.0.borrow_mut().notifying = false;
    }
}

pub fn signal<T>(value: T) -> Signal<T> {
    Signal::new(value)
}
