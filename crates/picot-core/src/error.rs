use thiserror::Error;

/// Misuse of a [`ContextHandle`](crate::ContextHandle).
///
/// These are programming errors, not runtime conditions: a consumer was
/// handed the wrong handle or outlived its provider. They should surface
/// immediately at the point of use.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("{context} used without a provider; inject a handle from Provider::handle()")]
    Unprovided { context: &'static str },

    #[error("{context} accessed after its provider was dropped")]
    Dropped { context: &'static str },

    #[error("{context} accessed re-entrantly while already borrowed")]
    Reentrant { context: &'static str },
}
