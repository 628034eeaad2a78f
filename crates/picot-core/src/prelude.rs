pub use crate::context::{ContextHandle, Provider};
pub use crate::effects::{Dispose, on_unmount};
pub use crate::error::ContextError;
pub use crate::scope::{Scope, current_scope, scoped_effect};
pub use crate::signal::{Signal, SubId, signal};
