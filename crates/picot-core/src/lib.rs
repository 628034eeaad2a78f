//! # Signals, scopes, and shared context
//!
//! Picot's core is a small single-threaded reactive toolkit. There are
//! three pieces:
//!
//! - `Signal<T>` — observable, reactive value.
//! - `Scope` / `Dispose` — lifecycle-aware cleanup for anything that
//!   registers itself somewhere else (listeners, in-flight requests).
//! - `Provider<T>` / `ContextHandle<T>` — explicitly injected shared state
//!   with fail-fast access.
//!
//! ## Signals
//!
//! `Signal<T>` is a cloneable handle to a piece of state:
//!
//! ```rust
//! use picot_core::*;
//!
//! let count = signal(0);
//! count.set(1);
//! count.update(|v| *v += 1);
//! assert_eq!(count.get(), 2);
//! ```
//!
//! Subscribers are invoked synchronously on every write and can be detached
//! again with the `SubId` returned from `subscribe`.
//!
//! ## Scopes and cleanup
//!
//! Long-lived helpers (event subscriptions, fetchers) register a disposer
//! with the current `Scope` when one is installed, so tearing down the
//! scope tears down everything created inside it:
//!
//! ```rust
//! use picot_core::*;
//!
//! let scope = Scope::new();
//! scope.run(|| {
//!     scoped_effect(|| {
//!         log::info!("mounted");
//!         on_unmount(|| log::info!("unmounted"))
//!     });
//! });
//! scope.dispose(); // runs the unmount cleanup
//! ```
//!
//! ## Shared context
//!
//! Instead of ambient globals, shared state is owned by a single root
//! `Provider<T>` and handed to dependents as weak `ContextHandle<T>`s.
//! Using a handle whose provider is gone (or a handle that was never
//! bound) is a programming error and fails immediately with a
//! [`ContextError`].

pub mod context;
pub mod effects;
pub mod error;
pub mod prelude;
pub mod scope;
pub mod signal;

pub use context::*;
pub use effects::*;
pub use error::*;
pub use prelude::*;
pub use scope::*;
pub use signal::*;
