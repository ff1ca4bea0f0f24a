//! Service layer: request context, clock, and the validated operations
//! handlers call.

pub mod clock;
pub mod context;
pub mod services;

pub use clock::{Clock, SystemClock};
pub use context::RequestContext;
