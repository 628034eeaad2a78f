//! # State hooks
//!
//! Building blocks that a view layer binds against. Each one keeps its
//! observable state in [`picot_core`] signals and registers its teardown
//! with the current [`Scope`](picot_core::Scope) when one is installed:
//!
//! - [`Subscription`](events::Subscription) — attach a callback to an
//!   [`EventTarget`](events::EventTarget) and swap the callback without
//!   re-registering.
//! - [`Fetcher`](fetch::Fetcher) — one cancellable request at a time;
//!   superseded responses are discarded, never applied.
//! - [`StoredValue`](storage::StoredValue) — a value mirrored into a
//!   [`KvStore`](storage::KvStore) with best-effort writes.
//! - [`InputState`](input::InputState) / [`WindowSize`](window::WindowSize)
//!   — small text-input and resize-tracking helpers.

pub mod error;
pub mod events;
pub mod fetch;
pub mod input;
pub mod storage;
pub mod window;

pub use error::{FetchError, StoreError};
pub use events::{
    Event, EventPayload, EventTarget, ListenerId, ListenerOptions, Subscription, TargetRef,
};
pub use fetch::{
    AbortSignal, FetchStatus, Fetcher, HttpTransport, RequestId, Transport, TransportRequest,
};
pub use input::InputState;
pub use storage::{JsonFileStore, KvStore, MemoryStore, StoredValue};
pub use window::WindowSize;
