//! pv-core: shared foundation for parview.
//!
//! Contains:
//! - error (shared error types)
//! - numeric (float parsing + engine-compatible formatting)
//! - value (opaque case result values)
//! - observe (thread-safe listener sets)

pub mod error;
pub mod numeric;
pub mod observe;
pub mod value;

// Re-exports: nice ergonomics for downstream crates
pub use error::{PvError, PvResult};
pub use numeric::*;
pub use observe::{ListenerId, ListenerSet};
pub use value::{MISSING, Value};
