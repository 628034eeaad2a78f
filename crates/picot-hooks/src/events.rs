//! Event targets and the subscription helper.
//!
//! [`EventTarget`] is the capability handle: anything that wants to emit
//! named events owns one and hands clones to interested parties.
//! [`Subscription`] is the consumer side: one low-level registration that
//! forwards to a swappable handler cell, so replacing the handler does not
//! churn the registration.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use picot_core::{Dispose, current_scope};

pub type ListenerId = u64;

#[derive(Clone, Debug, PartialEq)]
pub enum EventPayload {
    None,
    Pointer { x: f32, y: f32 },
    Key(String),
    Size { width: u32, height: u32 },
    Scroll { dx: f32, dy: f32 },
}

pub struct Event {
    pub name: String,
    pub payload: EventPayload,
    default_prevented: Cell<bool>,
    // true while the event is being delivered to a passive listener
    passive_delivery: Cell<bool>,
}

impl Event {
    pub fn new(name: impl Into<String>, payload: EventPayload) -> Self {
        Self {
            name: name.into(),
            payload,
            default_prevented: Cell::new(false),
            passive_delivery: Cell::new(false),
        }
    }

    /// Marks the event's default action as cancelled. Ignored (with a
    /// warning) when called from a passive listener.
    pub fn prevent_default(&self) {
        if self.passive_delivery.get() {
            log::warn!(
                "prevent_default() ignored for '{}': listener is passive",
                self.name
            );
            return;
        }
        self.default_prevented.set(true);
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    /// Capture listeners are delivered before non-capture ones.
    pub capture: bool,
    /// `None` lets the target pick a default (scroll events default to
    /// passive).
    pub passive: Option<bool>,
    /// Remove the listener after its first delivery.
    pub once: bool,
}

struct Entry {
    id: ListenerId,
    options: ListenerOptions,
    callback: Rc<dyn Fn(&Event)>,
}

#[derive(Default)]
struct Registry {
    next_id: ListenerId,
    listeners: HashMap<String, Vec<Entry>>,
}

/// Cloneable registry of event listeners keyed by event name.
#[derive(Clone, Default)]
pub struct EventTarget {
    inner: Rc<RefCell<Registry>>,
}

impl EventTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(
        &self,
        name: &str,
        options: ListenerOptions,
        callback: impl Fn(&Event) + 'static,
    ) -> ListenerId {
        let mut reg = self.inner.borrow_mut();
        reg.next_id += 1;
        let id = reg.next_id;
        reg.listeners.entry(name.to_string()).or_default().push(Entry {
            id,
            options,
            callback: Rc::new(callback),
        });
        id
    }

    /// Detaches a listener. Unknown ids are ignored.
    pub fn remove_listener(&self, id: ListenerId) {
        let mut reg = self.inner.borrow_mut();
        for entries in reg.listeners.values_mut() {
            entries.retain(|e| e.id != id);
        }
    }

    pub fn listener_count(&self, name: &str) -> usize {
        self.inner
            .borrow()
            .listeners
            .get(name)
            .map_or(0, |v| v.len())
    }

    /// Total number of listeners ever registered on this target.
    pub fn registrations(&self) -> u64 {
        self.inner.borrow().next_id
    }

    /// Delivers `event` to every matching listener, capture listeners
    /// first. Returns `false` when a listener cancelled the default action.
    pub fn emit(&self, event: &Event) -> bool {
        let mut snapshot: Vec<(ListenerId, ListenerOptions, Rc<dyn Fn(&Event)>)> = {
            let reg = self.inner.borrow();
            reg.listeners
                .get(&event.name)
                .map(|entries| {
                    entries
                        .iter()
                        .map(|e| (e.id, e.options, e.callback.clone()))
                        .collect()
                })
                .unwrap_or_default()
        };
        snapshot.sort_by_key(|(_, opts, _)| !opts.capture);

        let mut spent = Vec::new();
        for (id, options, callback) in snapshot {
            // listeners removed by an earlier callback are skipped
            if !self.still_registered(&event.name, id) {
                continue;
            }
            event.passive_delivery.set(options.passive.unwrap_or(false));
            callback(event);
            event.passive_delivery.set(false);
            if options.once {
                spent.push(id);
            }
        }
        for id in spent {
            self.remove_listener(id);
        }
        !event.default_prevented()
    }

    pub fn same_target(&self, other: &EventTarget) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // only the event's own list can hold the id being dispatched
    fn still_registered(&self, name: &str, id: ListenerId) -> bool {
        self.inner
            .borrow()
            .listeners
            .get(name)
            .is_some_and(|entries| entries.iter().any(|e| e.id == id))
    }
}

/// Where a subscription should attach, resolved at bind time.
///
/// The `Cell` form points at a slot whose target may appear, change, or
/// vanish after the subscription was set up; `rebind` re-resolves it.
#[derive(Clone, Default)]
pub enum TargetRef {
    #[default]
    None,
    Direct(EventTarget),
    Cell(Rc<RefCell<Option<EventTarget>>>),
}

impl TargetRef {
    pub fn resolve(&self) -> Option<EventTarget> {
        match self {
            TargetRef::None => None,
            TargetRef::Direct(t) => Some(t.clone()),
            TargetRef::Cell(cell) => cell.borrow().clone(),
        }
    }
}

impl From<EventTarget> for TargetRef {
    fn from(t: EventTarget) -> Self {
        TargetRef::Direct(t)
    }
}

impl From<&EventTarget> for TargetRef {
    fn from(t: &EventTarget) -> Self {
        TargetRef::Direct(t.clone())
    }
}

impl From<Option<EventTarget>> for TargetRef {
    fn from(t: Option<EventTarget>) -> Self {
        t.map_or(TargetRef::None, TargetRef::Direct)
    }
}

impl From<Rc<RefCell<Option<EventTarget>>>> for TargetRef {
    fn from(cell: Rc<RefCell<Option<EventTarget>>>) -> Self {
        TargetRef::Cell(cell)
    }
}

type Handler = Rc<dyn Fn(&Event)>;

struct Binding {
    target: EventTarget,
    listener: ListenerId,
}

struct SubState {
    handler: RefCell<Handler>,
    binding: RefCell<Option<Binding>>,
}

/// One logical observation of `(target, event_name)`.
///
/// The low-level listener registered on the target forwards to whatever the
/// handler cell currently holds, so [`set_handler`](Subscription::set_handler)
/// is free of registration churn. Changing the target, event name, or
/// options goes through [`rebind`](Subscription::rebind), which tears the
/// registration down and re-establishes it.
pub struct Subscription {
    state: Rc<SubState>,
}

impl Subscription {
    pub fn observe(
        target: impl Into<TargetRef>,
        event_name: &str,
        handler: impl Fn(&Event) + 'static,
        options: ListenerOptions,
    ) -> Self {
        let state = Rc::new(SubState {
            handler: RefCell::new(Rc::new(handler) as Handler),
            binding: RefCell::new(None),
        });
        let sub = Self { state };
        sub.attach(&target.into(), event_name, options);

        if let Some(scope) = current_scope() {
            let state = sub.state.clone();
            scope.add_disposer(Dispose::new(move || detach(&state)));
        }
        sub
    }

    /// Swaps the handler without touching the low-level registration.
    pub fn set_handler(&self, handler: impl Fn(&Event) + 'static) {
        *self.state.handler.borrow_mut() = Rc::new(handler);
    }

    /// Tears down the current registration and attaches to the newly
    /// resolved target. The handler cell is preserved.
    pub fn rebind(
        &self,
        target: impl Into<TargetRef>,
        event_name: &str,
        options: ListenerOptions,
    ) {
        detach(&self.state);
        self.attach(&target.into(), event_name, options);
    }

    /// Removes the low-level listener. Safe to call repeatedly; failures
    /// (target already gone) are swallowed.
    pub fn cancel(&self) {
        detach(&self.state);
    }

    pub fn is_bound(&self) -> bool {
        self.state.binding.borrow().is_some()
    }

    fn attach(&self, target: &TargetRef, event_name: &str, mut options: ListenerOptions) {
        if event_name.is_empty() {
            return;
        }
        let Some(target) = target.resolve() else {
            return;
        };
        if options.passive.is_none() && event_name == "scroll" {
            options.passive = Some(true);
        }

        // weak so the target's listener list never keeps the subscription alive
        let state = Rc::downgrade(&self.state);
        let forward = move |event: &Event| {
            let Some(state) = state.upgrade() else { return };
            // clone out of the cell so the handler may replace itself
            let handler = state.handler.borrow().clone();
            handler(event);
        };
        let listener = target.add_listener(event_name, options, forward);
        *self.state.binding.borrow_mut() = Some(Binding { target, listener });
    }
}

fn detach(state: &SubState) {
    if let Some(binding) = state.binding.borrow_mut().take() {
        binding.target.remove_listener(binding.listener);
    }
}

impl Drop for SubState {
    fn drop(&mut self) {
        detach(self);
    }
}
