//! Optional tracing integration.
//!
//! With the `tracing-integration` feature enabled the macros here are the
//! `tracing` crate's own. Without it they expand to nothing, so logging call
//! sites cost nothing in builds that do not want a subscriber.
//!
//! ```ignore
//! use stoichio::tracing_compat::debug;
//!
//! debug!(kind = %kind, amount, "demand issued");
//! ```

#[cfg(feature = "tracing-integration")]
pub use tracing::{debug, error, info, trace};

#[cfg(not(feature = "tracing-integration"))]
mod noop {
    #[doc(hidden)]
    #[macro_export]
    macro_rules! __stoichio_noop_log {
        ($($arg:tt)*) => {{}};
    }
}

#[cfg(not(feature = "tracing-integration"))]
pub use crate::__stoichio_noop_log as debug;
#[cfg(not(feature = "tracing-integration"))]
pub use crate::__stoichio_noop_log as error;
#[cfg(not(feature = "tracing-integration"))]
pub use crate::__stoichio_noop_log as info;
#[cfg(not(feature = "tracing-integration"))]
pub use crate::__stoichio_noop_log as trace;
